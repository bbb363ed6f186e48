//! Plain-text extractor.

use std::borrow::Cow;

use crate::detect::ContentType;
use crate::error::Result;

use super::{Extraction, TextExtractor};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decodes plain text as UTF-8, replacing invalid sequences with U+FFFD.
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor {
    _private: (),
}

impl PlainTextExtractor {
    /// Create a new plain-text extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl TextExtractor for PlainTextExtractor {
    fn content_type(&self) -> ContentType {
        ContentType::PlainText
    }

    fn name(&self) -> &str {
        "text"
    }

    fn extract(&self, data: &[u8]) -> Result<Extraction> {
        let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
        let decoded = String::from_utf8_lossy(data);
        let lossy = matches!(decoded, Cow::Owned(_));
        if lossy {
            log::warn!("plain text is not valid UTF-8; invalid bytes were replaced");
        }

        let text = decoded.into_owned();
        let unit_count = text.lines().count() as u32;
        let empty_units = text.lines().filter(|l| l.trim().is_empty()).count() as u32;

        Ok(Extraction {
            text,
            unit_count,
            empty_units,
            lossy,
        })
    }
}
