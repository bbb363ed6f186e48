//! DOCX text extractor.
//!
//! Reads `word/document.xml` from the package and emits each paragraph's
//! text followed by a newline. Tabs and line breaks inside a paragraph are
//! kept as `\t` and `\n`.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::detect::ContentType;
use crate::error::{Error, Result};

use super::{Extraction, TextExtractor};

const DOCUMENT_PART: &str = "word/document.xml";

/// Word 2007+ (`.docx`) extractor.
#[derive(Debug, Clone, Default)]
pub struct DocxExtractor {
    _private: (),
}

impl DocxExtractor {
    /// Create a new DOCX extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl TextExtractor for DocxExtractor {
    fn content_type(&self) -> ContentType {
        ContentType::Docx
    }

    fn name(&self) -> &str {
        "docx"
    }

    fn extract(&self, data: &[u8]) -> Result<Extraction> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;
        let mut xml = String::new();
        archive
            .by_name(DOCUMENT_PART)
            .map_err(|_| Error::Docx(format!("missing {}", DOCUMENT_PART)))?
            .read_to_string(&mut xml)?;

        paragraphs_from_xml(&xml)
    }
}

/// Collect paragraph text from WordprocessingML.
fn paragraphs_from_xml(xml: &str) -> Result<Extraction> {
    let mut reader = Reader::from_str(xml);
    let mut extraction = Extraction::default();
    let mut paragraph = String::new();
    // w:p can nest through text boxes; inner text joins the outer paragraph
    let mut depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => {
                    if depth == 0 {
                        paragraph.clear();
                    }
                    depth += 1;
                }
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:p" => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        finish_paragraph(&mut extraction, &paragraph);
                    }
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" if depth == 0 => finish_paragraph(&mut extraction, ""),
                b"w:tab" if depth > 0 => paragraph.push('\t'),
                b"w:br" | b"w:cr" if depth > 0 => paragraph.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text => paragraph.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(extraction)
}

fn finish_paragraph(extraction: &mut Extraction, paragraph: &str) {
    extraction.unit_count += 1;
    if paragraph.trim().is_empty() {
        extraction.empty_units += 1;
    }
    extraction.text.push_str(paragraph);
    extraction.text.push('\n');
}
