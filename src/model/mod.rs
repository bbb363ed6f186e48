//! Document model types.
//!
//! A [`Document`] is the text extracted from one upload. It is immutable
//! after extraction; its normalized form is derived on demand and cached.

mod document;

pub use document::{Document, DocumentStats, Metadata, PREVIEW_CHARS};
