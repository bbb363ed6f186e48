//! # doccompare
//!
//! Document comparison library for Rust.
//!
//! This library extracts text from PDF, DOCX, and plain-text uploads and
//! compares two documents in two ways: a line-aligned, word-highlighted
//! side-by-side diff, and a model-assisted narrative verdict (approval of a
//! proposal against a circular, or a meaning-level comparison).
//!
//! ## Quick Start
//!
//! ```no_run
//! use doccompare::{diff_files, render};
//!
//! fn main() -> doccompare::Result<()> {
//!     let report = diff_files("circular_v1.pdf", "circular_v2.docx")?;
//!     println!("{} changed rows", report.stats.changed_rows);
//!
//!     let html = render::to_html_table(&report);
//!     std::fs::write("diff.html", html)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Extraction**: PDF (lopdf), DOCX (zip + quick-xml), plain text with lossy UTF-8
//! - **Normalization**: boilerplate header/footer removal, whitespace cleanup
//! - **Diff**: LCS line alignment with token-level `<ins>`/`<del>` markup
//! - **Chunking**: paragraph-aligned chunks for bounded model input
//! - **Narrative comparison**: pluggable completion service, OpenAI-compatible client

pub mod chunk;
pub mod compare;
pub mod detect;
pub mod diff;
pub mod error;
pub mod extract;
pub mod model;
pub mod normalize;
pub mod render;
pub mod session;

// Re-export commonly used types
pub use chunk::{chunk_text, join_chunks, Chunk, ChunkOptions, Chunker};
pub use compare::{
    extract_verdict, Assessment, ComparatorOptions, CompletionService, Mode, NarrativeComparator,
    Verdict,
};
pub use detect::{detect_from_bytes, ContentType};
pub use diff::{diff_texts, DiffEngine, DiffOptions, DiffReport, DiffRow, DiffStats, RowKind};
pub use error::{Error, Result};
pub use extract::{extract_file, extract_text, ExtractorRegistry, TextExtractor};
pub use model::{Document, DocumentStats, Metadata};
pub use normalize::{normalize, NormalizeOptions, NormalizePreset, Normalizer};
pub use render::{ApprovalReport, HtmlOptions, JsonFormat};
pub use session::ComparisonSession;

#[cfg(feature = "openai")]
pub use compare::{OpenAiClient, ServiceConfig};

use std::path::Path;

/// Diff the raw text of two files.
///
/// # Example
///
/// ```no_run
/// use doccompare::diff_files;
///
/// let report = diff_files("old.txt", "new.txt").unwrap();
/// println!("similarity {:.2}", report.stats.similarity);
/// ```
pub fn diff_files<P: AsRef<Path>, Q: AsRef<Path>>(left: P, right: Q) -> Result<DiffReport> {
    DocCompare::new().diff(left, right)
}

/// Diff two files and render a standalone HTML page.
///
/// # Example
///
/// ```no_run
/// use doccompare::diff_files_to_html;
///
/// let html = diff_files_to_html("old.pdf", "new.pdf").unwrap();
/// std::fs::write("diff.html", html).unwrap();
/// ```
pub fn diff_files_to_html<P: AsRef<Path>, Q: AsRef<Path>>(left: P, right: Q) -> Result<String> {
    let session = DocCompare::new().open(left, right)?;
    let report = session.diff(false);
    let options = HtmlOptions::default().with_titles(
        session.left().metadata.name.clone(),
        session.right().metadata.name.clone(),
    );
    Ok(render::to_html_page(&report, &options))
}

/// Builder for opening and comparing a pair of documents.
///
/// # Example
///
/// ```no_run
/// use doccompare::{DocCompare, NormalizePreset};
///
/// let report = DocCompare::new()
///     .normalized(NormalizePreset::Strict)
///     .diff("circular.pdf", "proposal.docx")?;
/// # Ok::<(), doccompare::Error>(())
/// ```
pub struct DocCompare {
    registry: ExtractorRegistry,
    normalizer: Normalizer,
    normalize_before_diff: bool,
}

impl DocCompare {
    /// Create a new builder with the default extractors.
    pub fn new() -> Self {
        Self {
            registry: ExtractorRegistry::with_defaults(),
            normalizer: Normalizer::default(),
            normalize_before_diff: false,
        }
    }

    /// Use a custom extractor registry.
    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set the normalizer that opened sessions apply to both texts.
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Normalize with a preset before diffing as well.
    pub fn normalized(mut self, preset: NormalizePreset) -> Self {
        self.normalizer = Normalizer::from_preset(preset);
        self.normalize_before_diff = true;
        self
    }

    /// Extract both files into a session.
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        left: P,
        right: Q,
    ) -> Result<ComparisonSession> {
        let session = ComparisonSession::from_files_with(&self.registry, left, right)?;
        Ok(session.with_normalizer(self.normalizer.clone()))
    }

    /// Extract and diff two files.
    pub fn diff<P: AsRef<Path>, Q: AsRef<Path>>(&self, left: P, right: Q) -> Result<DiffReport> {
        let session = self.open(left, right)?;
        Ok(session.diff(self.normalize_before_diff))
    }
}

impl Default for DocCompare {
    fn default() -> Self {
        Self::new()
    }
}
