//! Content-type resolution for uploaded documents.
//!
//! An upload arrives with a declared MIME type, a file name, or neither.
//! [`ContentType`] is the closed set of kinds the extractors understand;
//! anything else is rejected with [`Error::UnsupportedContentType`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// MIME type for PDF documents.
pub const MIME_PDF: &str = "application/pdf";
/// MIME type for Office Open XML word-processing documents.
pub const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// MIME type for plain text.
pub const MIME_TEXT: &str = "text/plain";

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
/// Local file header of a ZIP container (DOCX is a ZIP archive).
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// Bytes read from the head of a file when sniffing its type.
const SNIFF_LEN: usize = 4096;

/// The document kinds that can be turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Portable Document Format
    Pdf,
    /// Word 2007+ document
    Docx,
    /// UTF-8 (or nearly UTF-8) plain text
    PlainText,
}

impl ContentType {
    /// Resolve a declared MIME type. Parameters such as `; charset=utf-8` are ignored.
    pub fn from_mime(mime: &str) -> Result<Self> {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            MIME_PDF => Ok(ContentType::Pdf),
            MIME_DOCX => Ok(ContentType::Docx),
            MIME_TEXT => Ok(ContentType::PlainText),
            _ => Err(Error::UnsupportedContentType(mime.to_string())),
        }
    }

    /// Resolve a file extension (without the leading dot, any case).
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Ok(ContentType::Pdf),
            "docx" => Ok(ContentType::Docx),
            "txt" | "text" => Ok(ContentType::PlainText),
            _ => Err(Error::UnsupportedContentType(format!(".{}", ext))),
        }
    }

    /// Resolve from a path's extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            Error::UnsupportedContentType(format!("{} (no file extension)", path.display()))
        })?;
        Self::from_extension(ext)
    }

    /// Canonical MIME type.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ContentType::Pdf => MIME_PDF,
            ContentType::Docx => MIME_DOCX,
            ContentType::PlainText => MIME_TEXT,
        }
    }

    /// Short lowercase name, also used as the extractor name.
    pub fn name(&self) -> &'static str {
        match self {
            ContentType::Pdf => "pdf",
            ContentType::Docx => "docx",
            ContentType::PlainText => "text",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// Sniff the content type from the leading bytes of a file.
///
/// PDF is recognised by its `%PDF-` header, DOCX by a ZIP header whose
/// first entries mention `word/` or `[Content_Types].xml`. Data that is
/// neither and contains no NUL bytes is treated as plain text.
pub fn detect_from_bytes(data: &[u8]) -> Result<ContentType> {
    if data.starts_with(PDF_MAGIC) {
        return Ok(ContentType::Pdf);
    }

    if data.starts_with(ZIP_MAGIC) {
        let head = &data[..data.len().min(SNIFF_LEN)];
        if contains(head, b"word/") || contains(head, b"[Content_Types].xml") {
            return Ok(ContentType::Docx);
        }
        return Err(Error::UnsupportedContentType(
            "ZIP archive that is not a DOCX document".into(),
        ));
    }

    let head = &data[..data.len().min(SNIFF_LEN)];
    if head.contains(&0) {
        return Err(Error::UnsupportedContentType("binary data".into()));
    }

    Ok(ContentType::PlainText)
}

/// Sniff the content type of a file on disk.
pub fn detect_from_path<P: AsRef<Path>>(path: P) -> Result<ContentType> {
    let mut file = File::open(path)?;
    let mut head = Vec::with_capacity(SNIFF_LEN);
    file.by_ref().take(SNIFF_LEN as u64).read_to_end(&mut head)?;
    detect_from_bytes(&head)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
