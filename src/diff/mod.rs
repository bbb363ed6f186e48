//! Side-by-side diff engine.
//!
//! Two texts are split into lines and aligned with an LCS-based opcode
//! sequence. Equal lines become `equal` rows. Lines inside a changed span
//! are paired by position and diffed again at the token level, so a
//! reviewer sees exactly which words and punctuation changed.
//!
//! # Example
//!
//! ```
//! use doccompare::diff::{diff_texts, RowKind};
//!
//! let report = diff_texts("Hello world\nFoo bar", "Hello there\nFoo bar");
//! assert_eq!(report.rows[0].kind, RowKind::Changed);
//! assert_eq!(report.rows[0].left, "Hello <del>world</del>");
//! assert_eq!(report.rows[1].kind, RowKind::Equal);
//! ```

mod opcodes;
mod rows;
mod tokenize;

pub use opcodes::{matched_len, opcodes, Opcode, Tag};
pub use rows::{escape_html, highlight_words, DiffRow, RowKind};
pub use tokenize::tokenize;

use crate::model::DocumentStats;
use crate::normalize::{unify_line_endings, Normalizer};
use serde::{Deserialize, Serialize};

/// Options for the diff engine.
#[derive(Debug, Clone, Default)]
pub struct DiffOptions {
    /// Normalize both texts before diffing
    pub normalizer: Option<Normalizer>,
}

impl DiffOptions {
    /// Create default options (raw texts are diffed).
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize both texts before diffing.
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }
}

/// Equality statistics for a compared pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiffStats {
    /// The compared texts are byte-for-byte identical
    pub exact_match: bool,
    /// Counts for the left text
    pub left: DocumentStats,
    /// Counts for the right text
    pub right: DocumentStats,
    /// Rows marked equal
    pub equal_rows: usize,
    /// Rows marked changed
    pub changed_rows: usize,
    /// `2 * matched_lines / total_lines`, 1.0 for two empty texts
    pub similarity: f64,
}

/// Result of diffing two texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffReport {
    /// Rows in display order
    pub rows: Vec<DiffRow>,
    /// Equality statistics
    pub stats: DiffStats,
}

impl DiffReport {
    /// Rows marked changed.
    pub fn changed_rows(&self) -> impl Iterator<Item = &DiffRow> {
        self.rows.iter().filter(|row| row.is_changed())
    }

    /// Check if the two texts have no differing rows.
    pub fn is_identical(&self) -> bool {
        self.stats.changed_rows == 0
    }
}

/// Line-aligned, word-highlighted diff engine.
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    options: DiffOptions,
}

impl DiffEngine {
    /// Create an engine with the given options.
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    /// Diff two texts. Any input, including empty strings, is accepted.
    pub fn diff(&self, left: &str, right: &str) -> DiffReport {
        let (left, right) = match &self.options.normalizer {
            Some(normalizer) => (normalizer.process(left), normalizer.process(right)),
            None => (unify_line_endings(left), unify_line_endings(right)),
        };

        let left_lines = split_lines(&left);
        let right_lines = split_lines(&right);
        let ops = opcodes(&left_lines, &right_lines);
        let rows = rows::build_rows(&left_lines, &right_lines, &ops);

        let changed_rows = rows.iter().filter(|row| row.is_changed()).count();
        let total_lines = left_lines.len() + right_lines.len();
        let similarity = if total_lines == 0 {
            1.0
        } else {
            2.0 * matched_len(&ops) as f64 / total_lines as f64
        };

        log::debug!(
            "diffed {} vs {} lines: {} opcodes, {} changed rows",
            left_lines.len(),
            right_lines.len(),
            ops.len(),
            changed_rows
        );

        DiffReport {
            stats: DiffStats {
                exact_match: left == right,
                left: DocumentStats::from_text(&left),
                right: DocumentStats::from_text(&right),
                equal_rows: rows.len() - changed_rows,
                changed_rows,
                similarity,
            },
            rows,
        }
    }
}

/// Diff two texts with default options.
pub fn diff_texts(left: &str, right: &str) -> DiffReport {
    DiffEngine::default().diff(left, right)
}

/// Split text with `\n` line endings into lines. An empty text has no lines
/// and a trailing newline does not start a new line.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_terminator('\n').collect()
}
