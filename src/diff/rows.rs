//! Side-by-side rows built from a line alignment.

use serde::{Deserialize, Serialize};

use super::opcodes::{word_opcodes, Opcode, Tag};
use super::tokenize::tokenize;

/// Whether a row's two sides match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    /// Both sides are the same line
    Equal,
    /// The sides differ; changed tokens are marked up
    Changed,
}

/// One row of the side-by-side view.
///
/// `left` and `right` are HTML fragments: text is escaped, removed tokens
/// are wrapped in `<del>` and added tokens in `<ins>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRow {
    /// Row kind
    pub kind: RowKind,
    /// 1-based left line number, blank when the left side has no content
    pub left_number: Option<usize>,
    /// Rendered left content
    pub left: String,
    /// 1-based right line number, blank when the right side has no content
    pub right_number: Option<usize>,
    /// Rendered right content
    pub right: String,
}

impl DiffRow {
    /// Check if this row has a change.
    pub fn is_changed(&self) -> bool {
        self.kind == RowKind::Changed
    }
}

/// Per-side line counters. A counter only advances on rows where its side
/// has non-empty content.
#[derive(Debug, Default)]
struct LineNumbers {
    left: usize,
    right: usize,
}

impl LineNumbers {
    fn next(counter: &mut usize, line: &str) -> Option<usize> {
        if line.is_empty() {
            None
        } else {
            *counter += 1;
            Some(*counter)
        }
    }

    fn row(&mut self, left_line: &str, right_line: &str) -> (Option<usize>, Option<usize>) {
        (
            Self::next(&mut self.left, left_line),
            Self::next(&mut self.right, right_line),
        )
    }
}

/// Build rows for two line sequences aligned by `ops`.
pub(crate) fn build_rows(left: &[&str], right: &[&str], ops: &[Opcode]) -> Vec<DiffRow> {
    let mut numbers = LineNumbers::default();
    let mut rows = Vec::with_capacity(left.len().max(right.len()));

    for op in ops {
        if op.tag == Tag::Equal {
            for (i, j) in op.a.clone().zip(op.b.clone()) {
                rows.push(equal_row(&mut numbers, left[i], right[j]));
            }
            continue;
        }

        // Pair changed lines positionally. A line without a partner is
        // always a change, even when it is blank.
        let span = op.a.len().max(op.b.len());
        for k in 0..span {
            let l = (k < op.a.len()).then(|| left[op.a.start + k]);
            let r = (k < op.b.len()).then(|| right[op.b.start + k]);
            let row = match (l, r) {
                (Some(l), Some(r)) if l == r => equal_row(&mut numbers, l, r),
                (l, r) => changed_row(&mut numbers, l.unwrap_or(""), r.unwrap_or("")),
            };
            rows.push(row);
        }
    }

    rows
}

fn equal_row(numbers: &mut LineNumbers, left: &str, right: &str) -> DiffRow {
    let (left_number, right_number) = numbers.row(left, right);
    DiffRow {
        kind: RowKind::Equal,
        left_number,
        left: escape_html(left),
        right_number,
        right: escape_html(right),
    }
}

fn changed_row(numbers: &mut LineNumbers, left: &str, right: &str) -> DiffRow {
    let (left_number, right_number) = numbers.row(left, right);
    let (left_html, right_html) = highlight_words(left, right);
    DiffRow {
        kind: RowKind::Changed,
        left_number,
        left: left_html,
        right_number,
        right: right_html,
    }
}

/// Render a token-level diff of two lines as a pair of HTML fragments.
pub fn highlight_words(left: &str, right: &str) -> (String, String) {
    let a = tokenize(left);
    let b = tokenize(right);
    let mut left_html = String::with_capacity(left.len() + 16);
    let mut right_html = String::with_capacity(right.len() + 16);

    for op in word_opcodes(&a, &b) {
        let removed = a[op.a.clone()].concat();
        let added = b[op.b.clone()].concat();
        match op.tag {
            Tag::Equal => {
                left_html.push_str(&escape_html(&removed));
                right_html.push_str(&escape_html(&added));
            }
            Tag::Delete => push_marked(&mut left_html, "del", &removed),
            Tag::Insert => push_marked(&mut right_html, "ins", &added),
            Tag::Replace => {
                push_marked(&mut left_html, "del", &removed);
                push_marked(&mut right_html, "ins", &added);
            }
        }
    }

    (left_html, right_html)
}

fn push_marked(output: &mut String, tag: &str, text: &str) {
    output.push('<');
    output.push_str(tag);
    output.push('>');
    output.push_str(&escape_html(text));
    output.push_str("</");
    output.push_str(tag);
    output.push('>');
}

/// Escape text for safe inclusion in HTML element content or attributes.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::opcodes;

    #[test]
    fn test_highlight_single_word() {
        let (l, r) = highlight_words("Hello world", "Hello there");
        assert_eq!(l, "Hello <del>world</del>");
        assert_eq!(r, "Hello <ins>there</ins>");
    }

    #[test]
    fn test_highlight_punctuation_only() {
        let (l, r) = highlight_words("Fees apply.", "Fees apply;");
        assert_eq!(l, "Fees apply<del>.</del>");
        assert_eq!(r, "Fees apply<ins>;</ins>");
    }

    #[test]
    fn test_highlight_insert_and_delete() {
        let (l, r) = highlight_words("pay within 30 days", "pay 30 days");
        assert_eq!(l, "pay <del>within </del>30 days");
        assert_eq!(r, "pay 30 days");
    }

    #[test]
    fn test_highlight_escapes() {
        let (l, r) = highlight_words("a < b", "a > b");
        assert_eq!(l, "a <del>&lt;</del> b");
        assert_eq!(r, "a <ins>&gt;</ins> b");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_rows_pairing_with_missing_lines() {
        let left = ["keep", "old one"];
        let right = ["keep", "new one", "extra"];
        let ops = opcodes(&left, &right);
        let rows = build_rows(&left, &right, &ops);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].kind, RowKind::Equal);
        assert_eq!(rows[1].kind, RowKind::Changed);
        assert_eq!(rows[1].left, "<del>old</del> one");
        assert_eq!(rows[1].right, "<ins>new</ins> one");
        assert_eq!(rows[2].left_number, None);
        assert_eq!(rows[2].left, "");
        assert_eq!(rows[2].right_number, Some(3));
        assert_eq!(rows[2].right, "<ins>extra</ins>");
    }

    #[test]
    fn test_identical_pair_inside_replace_is_equal() {
        let left = ["a", "same", "b"];
        let right = ["x", "same", "y"];
        // force a single replace over everything
        let ops = vec![Opcode::new(Tag::Replace, 0..3, 0..3)];
        let rows = build_rows(&left, &right, &ops);
        assert_eq!(rows[1].kind, RowKind::Equal);
        assert_eq!(rows[1].left_number, Some(2));
    }

    #[test]
    fn test_unpartnered_blank_line_is_changed() {
        let left = ["a", "b"];
        let right = ["a", "", "b"];
        let ops = opcodes(&left, &right);
        let rows = build_rows(&left, &right, &ops);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].kind, RowKind::Changed);
        assert_eq!(rows[1].left_number, None);
        assert_eq!(rows[1].right_number, None);
        assert_eq!(rows[2].kind, RowKind::Equal);
        assert_eq!(rows[2].right_number, Some(2));
    }

    #[test]
    fn test_blank_pair_inside_replace_is_equal() {
        let left = ["x", ""];
        let right = ["y", "", "z"];
        let ops = vec![Opcode::new(Tag::Replace, 0..2, 0..3)];
        let rows = build_rows(&left, &right, &ops);
        assert_eq!(rows[1].kind, RowKind::Equal);
        assert_eq!(rows[2].kind, RowKind::Changed);
    }
}
