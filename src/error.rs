//! Error types for doccompare.

use std::io;
use thiserror::Error;

/// Result type alias for doccompare operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting, comparing, or rendering documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The declared content type is not PDF, DOCX, or plain text.
    #[error("Unsupported content type: {0} (expected PDF, DOCX, or plain text)")]
    UnsupportedContentType(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// The DOCX container or its XML payload is malformed.
    #[error("DOCX parsing error: {0}")]
    Docx(String),

    /// No credential was supplied for the completion service.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// The completion service could not be configured.
    #[error("Service configuration error: {0}")]
    ServiceConfig(String),

    /// Error during rendering (HTML, Markdown, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Docx(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Docx(format!("invalid document.xml: {}", err))
    }
}
