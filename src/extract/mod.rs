//! Text extraction with a pluggable extractor per content type.
//!
//! Each supported [`ContentType`] has a [`TextExtractor`] that turns the
//! uploaded bytes into plain text, keeping page and paragraph boundaries
//! as newlines. Pages or paragraphs without text contribute an empty
//! string; undecodable bytes are replaced. Only an unsupported content
//! type or an unreadable container is an error.
//!
//! # Example
//!
//! ```no_run
//! use doccompare::extract::ExtractorRegistry;
//! use std::path::Path;
//!
//! fn main() -> doccompare::Result<()> {
//!     let registry = ExtractorRegistry::with_defaults();
//!     let doc = registry.extract_file(Path::new("circular.pdf"))?;
//!     println!("{} words", doc.word_count());
//!     Ok(())
//! }
//! ```

mod docx;
mod pdf;
mod text;

pub use docx::DocxExtractor;
pub use pdf::PdfExtractor;
pub use text::PlainTextExtractor;

use crate::detect::ContentType;
use crate::error::{Error, Result};
use crate::model::{Document, Metadata};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Text produced by an extractor, with extraction statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Concatenated visible text
    pub text: String,

    /// Pages, paragraphs, or lines read
    pub unit_count: u32,

    /// Units that yielded no text
    pub empty_units: u32,

    /// Whether undecodable bytes were replaced
    pub lossy: bool,
}

/// Trait for content-type specific text extractors.
///
/// Implement this trait to plug a different backend in for a content type.
pub trait TextExtractor: Send + Sync {
    /// The content type this extractor reads.
    fn content_type(&self) -> ContentType;

    /// Name of this extractor.
    fn name(&self) -> &str;

    /// Extract text from the raw bytes of an upload.
    fn extract(&self, data: &[u8]) -> Result<Extraction>;
}

/// Registry mapping content types to extractors.
pub struct ExtractorRegistry {
    by_type: HashMap<ContentType, Arc<dyn TextExtractor>>,
    by_name: HashMap<String, Arc<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            by_type: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the PDF, DOCX, and plain-text extractors.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfExtractor::new()));
        registry.register(Arc::new(DocxExtractor::new()));
        registry.register(Arc::new(PlainTextExtractor::new()));
        registry
    }

    /// Register an extractor, replacing any previous one for its content type.
    pub fn register(&mut self, extractor: Arc<dyn TextExtractor>) {
        self.by_type
            .insert(extractor.content_type(), extractor.clone());
        self.by_name
            .insert(extractor.name().to_lowercase(), extractor);
    }

    /// Get the extractor for a content type.
    pub fn get(&self, content_type: ContentType) -> Option<Arc<dyn TextExtractor>> {
        self.by_type.get(&content_type).cloned()
    }

    /// Get an extractor by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn TextExtractor>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if a content type has an extractor.
    pub fn supports(&self, content_type: ContentType) -> bool {
        self.by_type.contains_key(&content_type)
    }

    /// Extract text from bytes of the given content type.
    pub fn extract(&self, data: &[u8], content_type: ContentType) -> Result<Extraction> {
        let extractor = self
            .get(content_type)
            .ok_or_else(|| Error::UnsupportedContentType(content_type.to_string()))?;

        log::debug!(
            "extracting {} bytes with the {} extractor",
            data.len(),
            extractor.name()
        );
        extractor.extract(data)
    }

    /// Extract an upload into a [`Document`].
    pub fn extract_document(
        &self,
        name: &str,
        data: &[u8],
        content_type: ContentType,
    ) -> Result<Document> {
        let extraction = self.extract(data, content_type)?;

        if extraction.empty_units > 0 {
            log::warn!(
                "{}: {} of {} units yielded no text",
                name,
                extraction.empty_units,
                extraction.unit_count
            );
        }

        let mut metadata = Metadata::new(name, content_type);
        metadata.unit_count = extraction.unit_count;
        metadata.empty_units = extraction.empty_units;
        metadata.lossy = extraction.lossy;
        Ok(Document::new(extraction.text, metadata))
    }

    /// Extract an upload whose content type is given as a MIME string.
    pub fn extract_upload(&self, name: &str, data: &[u8], mime: &str) -> Result<Document> {
        let content_type = ContentType::from_mime(mime)?;
        self.extract_document(name, data, content_type)
    }

    /// Read and extract a file, using its extension as the declared type.
    pub fn extract_file(&self, path: &Path) -> Result<Document> {
        let content_type = ContentType::from_path(path)?;
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.extract_document(&name, &data, content_type)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Extract text from bytes with the default extractors.
pub fn extract_text(data: &[u8], content_type: ContentType) -> Result<String> {
    ExtractorRegistry::with_defaults()
        .extract(data, content_type)
        .map(|e| e.text)
}

/// Read and extract a file with the default extractors.
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    ExtractorRegistry::with_defaults().extract_file(path.as_ref())
}
