//! Paragraph-aligned chunking of normalized text.
//!
//! Long documents are split on paragraph boundaries (`\n\n`) into chunks
//! of at most `max_chars` characters so each fits the completion service's
//! input limit. Paragraphs are never split: one that alone exceeds the
//! budget becomes its own oversized chunk. Joining the chunks with
//! [`PARAGRAPH_SEPARATOR`] always reproduces the input exactly.

use serde::{Deserialize, Serialize};

/// Separator between paragraphs in normalized text.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Default chunk budget in characters.
pub const DEFAULT_MAX_CHARS: usize = 6000;

/// Options for chunking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkOptions {
    /// Maximum characters per chunk (Unicode scalar values)
    pub max_chars: usize,
}

impl ChunkOptions {
    /// Create options with the default budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the character budget.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

/// A contiguous run of paragraphs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position in the chunk sequence (0-indexed)
    pub index: usize,

    /// Chunk text, paragraphs joined by [`PARAGRAPH_SEPARATOR`]
    pub text: String,

    /// Length in characters
    pub char_len: usize,

    /// Number of paragraphs in this chunk
    pub paragraphs: usize,

    /// True when a single paragraph exceeded the budget
    pub oversized: bool,
}

/// Splits text into paragraph-aligned chunks.
#[derive(Debug, Clone, Default)]
pub struct Chunker {
    options: ChunkOptions,
}

impl Chunker {
    /// Create a chunker with the given options.
    pub fn new(options: ChunkOptions) -> Self {
        Self { options }
    }

    /// Create a chunker with a character budget.
    pub fn with_max_chars(max_chars: usize) -> Self {
        Self::new(ChunkOptions::new().with_max_chars(max_chars))
    }

    /// Split text into chunks.
    ///
    /// Text that already fits the budget comes back as a single chunk,
    /// including the empty string.
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        let max = self.options.max_chars;
        let total = text.chars().count();

        if total <= max {
            return vec![Chunk {
                index: 0,
                text: text.to_string(),
                char_len: total,
                paragraphs: text.split(PARAGRAPH_SEPARATOR).count(),
                oversized: false,
            }];
        }

        let sep_len = PARAGRAPH_SEPARATOR.chars().count();
        let mut builder = ChunkBuilder::default();
        let mut chunks = Vec::new();

        for paragraph in text.split(PARAGRAPH_SEPARATOR) {
            let len = paragraph.chars().count();

            if builder.paragraphs > 0 && builder.char_len + sep_len + len > max {
                chunks.push(builder.finish(chunks.len(), max));
            }
            builder.push(paragraph, len, sep_len);
        }

        if builder.paragraphs > 0 {
            chunks.push(builder.finish(chunks.len(), max));
        }

        log::debug!(
            "split {} chars into {} chunks (budget {})",
            total,
            chunks.len(),
            max
        );
        chunks
    }
}

#[derive(Default)]
struct ChunkBuilder {
    text: String,
    char_len: usize,
    paragraphs: usize,
}

impl ChunkBuilder {
    fn push(&mut self, paragraph: &str, len: usize, sep_len: usize) {
        if self.paragraphs > 0 {
            self.text.push_str(PARAGRAPH_SEPARATOR);
            self.char_len += sep_len;
        }
        self.text.push_str(paragraph);
        self.char_len += len;
        self.paragraphs += 1;
    }

    fn finish(&mut self, index: usize, max: usize) -> Chunk {
        let taken = std::mem::take(self);
        Chunk {
            index,
            oversized: taken.char_len > max,
            text: taken.text,
            char_len: taken.char_len,
            paragraphs: taken.paragraphs,
        }
    }
}

/// Split text into chunk strings of at most `max_chars` characters.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    Chunker::with_max_chars(max_chars)
        .split(text)
        .into_iter()
        .map(|chunk| chunk.text)
        .collect()
}

/// Reassemble chunks into the original text.
pub fn join_chunks<S: AsRef<str>>(chunks: &[S]) -> String {
    chunks
        .iter()
        .map(|c| c.as_ref())
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_text() -> String {
        [
            "Section 1. Scope of the circular.",
            "Section 2. Eligibility: applicants must be registered entities.",
            "",
            "Section 3. Funding is capped at 40% of project cost.",
            "\nSection 4. Reports are due quarterly.",
            "Annex — a very long paragraph that keeps going and going well past any small budget.",
        ]
        .join(PARAGRAPH_SEPARATOR)
    }

    #[test]
    fn test_fits_in_single_chunk() {
        let chunks = Chunker::default().split("short text\n\nsecond");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "short text\n\nsecond");
        assert_eq!(chunks[0].paragraphs, 2);
        assert!(!chunks[0].oversized);
    }

    #[test]
    fn test_empty_text() {
        let chunks = chunk_text("", 10);
        assert_eq!(chunks, vec![String::new()]);
        assert_eq!(join_chunks(&chunks), "");
    }

    #[test]
    fn test_reconstruction_for_all_budgets() {
        let text = sample_text();
        for budget in 0..=text.chars().count() + 1 {
            let chunks = chunk_text(&text, budget);
            assert_eq!(join_chunks(&chunks), text, "budget {}", budget);
        }
    }

    #[test]
    fn test_chunks_respect_budget() {
        let text = sample_text();
        for budget in 1..=120 {
            for chunk in Chunker::with_max_chars(budget).split(&text) {
                if chunk.paragraphs > 1 {
                    assert!(chunk.char_len <= budget, "budget {}: {:?}", budget, chunk);
                }
                if chunk.oversized {
                    assert_eq!(chunk.paragraphs, 1);
                }
                assert_eq!(chunk.char_len, chunk.text.chars().count());
            }
        }
    }

    #[test]
    fn test_oversized_paragraph_kept_whole() {
        let long = "y".repeat(50);
        let text = format!("a\n\n{}\n\nb", long);
        let chunks = Chunker::with_max_chars(10).split(&text);
        let texts: Vec<_> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["a", long.as_str(), "b"]);
        assert!(chunks[1].oversized);
        assert!(!chunks[0].oversized);
        assert_eq!(chunks[2].index, 2);
    }

    #[test]
    fn test_fifteen_thousand_chars_three_chunks() {
        let mut paragraphs: Vec<String> = (0..30).map(|_| "p".repeat(498)).collect();
        paragraphs[29] = "p".repeat(500);
        let text = paragraphs.join(PARAGRAPH_SEPARATOR);
        assert_eq!(text.chars().count(), 15000);

        let chunks = Chunker::default().split(&text);
        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(chunk.char_len <= DEFAULT_MAX_CHARS);
            assert!(!chunk.text.starts_with('\n'));
            assert!(!chunk.text.ends_with('\n'));
        }
        assert_eq!(join_chunks(&chunks.iter().map(|c| &c.text).collect::<Vec<_>>()), text);
    }

    #[test]
    fn test_multibyte_budget_counts_chars() {
        let text = "ééééé\n\nüüüüü";
        // 12 chars total, 24+ bytes
        let chunks = chunk_text(text, 12);
        assert_eq!(chunks.len(), 1);
        let chunks = chunk_text(text, 11);
        assert_eq!(chunks, vec!["ééééé".to_string(), "üüüüü".to_string()]);
    }
}
