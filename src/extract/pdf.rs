//! PDF text extractor backed by lopdf.

use lopdf::Document as LopdfDocument;

use crate::detect::ContentType;
use crate::error::{Error, Result};

use super::{Extraction, TextExtractor};

/// Extracts the text layer of each page. Scanned pages (no text layer)
/// contribute an empty string; OCR is not attempted.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor {
    _private: (),
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl TextExtractor for PdfExtractor {
    fn content_type(&self) -> ContentType {
        ContentType::Pdf
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn extract(&self, data: &[u8]) -> Result<Extraction> {
        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        let pages = doc.get_pages();
        let mut texts = Vec::with_capacity(pages.len());
        let mut empty_units = 0;

        for page_num in pages.keys() {
            let text = match doc.extract_text(&[*page_num]) {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("page {}: no extractable text ({})", page_num, e);
                    String::new()
                }
            };
            if text.trim().is_empty() {
                empty_units += 1;
            }
            texts.push(text);
        }

        Ok(Extraction {
            text: texts.join("\n"),
            unit_count: pages.len() as u32,
            empty_units,
            lossy: false,
        })
    }
}
