//! Document-level types.

use crate::detect::ContentType;
use crate::normalize::{NormalizeOptions, Normalizer};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::OnceLock;

/// Number of characters shown in a document preview.
pub const PREVIEW_CHARS: usize = 500;

/// Text extracted from a single uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Source metadata (name, content type, extraction details)
    pub metadata: Metadata,

    /// Raw extracted text
    text: String,

    /// Text normalized with the default options, computed on first request
    #[serde(skip)]
    normalized: OnceLock<String>,
}

impl Document {
    /// Create a document from extracted text.
    pub fn new(text: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            metadata,
            text: text.into(),
            normalized: OnceLock::new(),
        }
    }

    /// Create a plain-text document with default metadata.
    pub fn from_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(text, Metadata::new(name, ContentType::PlainText))
    }

    /// Raw extracted text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Normalized text using the default [`Normalizer`].
    pub fn normalized(&self) -> &str {
        self.normalized
            .get_or_init(|| Normalizer::default().process(&self.text))
    }

    /// Normalized text using a specific normalizer.
    ///
    /// Borrows the cached text when the normalizer runs with the default
    /// options; any other options are applied afresh.
    pub fn normalized_with(&self, normalizer: &Normalizer) -> Cow<'_, str> {
        if *normalizer.options() == NormalizeOptions::default() {
            Cow::Borrowed(self.normalized())
        } else {
            Cow::Owned(normalizer.process(&self.text))
        }
    }

    /// Number of whitespace-separated words in the raw text.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Number of Unicode scalar values in the raw text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if no text was extracted.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Word and character counts.
    pub fn stats(&self) -> DocumentStats {
        DocumentStats::from_text(&self.text)
    }

    /// The first [`PREVIEW_CHARS`] characters, followed by `...`.
    pub fn preview(&self) -> String {
        let head: String = self.text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    }
}

/// Source metadata for a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// File name or caller-supplied label
    pub name: String,

    /// Content type the text was extracted from
    pub content_type: ContentType,

    /// Pages (PDF) or paragraphs (DOCX) read; lines for plain text
    pub unit_count: u32,

    /// Units that yielded no text
    pub empty_units: u32,

    /// Whether undecodable bytes were replaced during decoding
    pub lossy: bool,

    /// When the text was extracted
    pub extracted_at: DateTime<Utc>,
}

impl Metadata {
    /// Create metadata stamped with the current time.
    pub fn new(name: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            name: name.into(),
            content_type,
            unit_count: 0,
            empty_units: 0,
            lossy: false,
            extracted_at: Utc::now(),
        }
    }
}

/// Word and character counts for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Whitespace-separated words
    pub words: usize,
    /// Unicode scalar values
    pub chars: usize,
}

impl DocumentStats {
    /// Count words and characters in a text.
    pub fn from_text(text: &str) -> Self {
        Self {
            words: text.split_whitespace().count(),
            chars: text.chars().count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_counts() {
        let doc = Document::from_text("a.txt", "Hello, world! Ünïcode text.");
        assert_eq!(doc.word_count(), 4);
        assert_eq!(doc.char_count(), 27);
        assert_eq!(doc.stats(), DocumentStats { words: 4, chars: 27 });
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_document_empty() {
        let doc = Document::from_text("empty.txt", "");
        assert!(doc.is_empty());
        assert_eq!(doc.word_count(), 0);
        assert_eq!(doc.normalized(), "");
    }

    #[test]
    fn test_normalized_is_cached() {
        let doc = Document::from_text("a.txt", "  Hello    world  \r\n");
        let first = doc.normalized() as *const str;
        let second = doc.normalized() as *const str;
        assert_eq!(doc.normalized(), "Hello world");
        assert_eq!(first, second);
        // raw text is untouched
        assert_eq!(doc.text(), "  Hello    world  \r\n");
    }

    #[test]
    fn test_normalized_with_ignores_default_cache() {
        let doc = Document::from_text("a.txt", "\u{FB01}nding  one");
        assert_eq!(doc.normalized(), "\u{FB01}nding one");

        let strict = Normalizer::from_preset(crate::normalize::NormalizePreset::Strict);
        assert_eq!(doc.normalized_with(&strict), "finding one");
        assert!(matches!(
            doc.normalized_with(&Normalizer::default()),
            Cow::Borrowed("\u{FB01}nding one")
        ));
    }

    #[test]
    fn test_preview_truncates() {
        let doc = Document::from_text("long.txt", "x".repeat(800));
        let preview = doc.preview();
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_serialize_skips_cache() {
        let doc = Document::from_text("a.txt", "Body");
        let _ = doc.normalized();
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"text\":\"Body\""));
        assert!(!json.contains("normalized"));
        assert!(json.contains("\"content_type\":\"plaintext\""));
    }
}
