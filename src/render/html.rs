//! HTML rendering of side-by-side diffs.

use crate::diff::{escape_html, DiffReport, DiffRow};

const STYLE: &str = "\
body { font-family: sans-serif; margin: 1.5em; }
table.diff { border-collapse: collapse; width: 100%; font-family: monospace; font-size: 13px; }
table.diff th { background: #f0f0f0; text-align: left; padding: 4px 8px; }
table.diff td { vertical-align: top; padding: 2px 8px; white-space: pre-wrap; word-break: break-word; }
table.diff td.lineno { color: #888; text-align: right; width: 3em; user-select: none; }
table.diff tr.changed td.content { background: #fffbe6; }
del { background: #ffd7d5; color: #82071e; text-decoration: line-through; }
ins { background: #ccffd8; color: #055d20; text-decoration: none; }
.stats { margin-bottom: 1em; color: #444; }
";

/// Titles shown above each column of a full page.
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Page title
    pub title: String,
    /// Left column heading
    pub left_title: String,
    /// Right column heading
    pub right_title: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            title: "Document comparison".to_string(),
            left_title: "Document 1".to_string(),
            right_title: "Document 2".to_string(),
        }
    }
}

impl HtmlOptions {
    pub fn with_titles(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left_title = left.into();
        self.right_title = right.into();
        self
    }
}

/// Render diff rows as a four-column `<table>`: left number, left content,
/// right number, right content.
pub fn to_html_table(report: &DiffReport) -> String {
    let mut output = String::with_capacity(report.rows.len() * 96 + 64);
    output.push_str("<table class=\"diff\">\n");
    for row in &report.rows {
        render_row(&mut output, row);
    }
    output.push_str("</table>\n");
    output
}

fn render_row(output: &mut String, row: &DiffRow) {
    let class = if row.is_changed() { "changed" } else { "equal" };
    output.push_str(&format!("<tr class=\"{}\">", class));
    push_cell(output, "lineno", &number(row.left_number));
    push_cell(output, "content", &row.left);
    push_cell(output, "lineno", &number(row.right_number));
    push_cell(output, "content", &row.right);
    output.push_str("</tr>\n");
}

fn push_cell(output: &mut String, class: &str, html: &str) {
    output.push_str("<td class=\"");
    output.push_str(class);
    output.push_str("\">");
    output.push_str(html);
    output.push_str("</td>");
}

fn number(n: Option<usize>) -> String {
    n.map(|n| n.to_string()).unwrap_or_default()
}

/// Render a standalone HTML page with a stylesheet, statistics, and the
/// diff table.
pub fn to_html_page(report: &DiffReport, options: &HtmlOptions) -> String {
    let stats = &report.stats;
    let summary = if stats.exact_match {
        "The documents are identical.".to_string()
    } else {
        format!(
            "{} changed rows, {} equal rows, similarity {:.1}%.",
            stats.changed_rows,
            stats.equal_rows,
            stats.similarity * 100.0
        )
    };

    let mut output = String::new();
    output.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    output.push_str(&format!("<title>{}</title>\n", escape_html(&options.title)));
    output.push_str(&format!("<style>\n{}</style>\n</head>\n<body>\n", STYLE));
    output.push_str(&format!("<h1>{}</h1>\n", escape_html(&options.title)));
    output.push_str(&format!(
        "<div class=\"stats\"><p>{}</p><p>{}: {} words, {} characters. {}: {} words, {} characters.</p></div>\n",
        summary,
        escape_html(&options.left_title),
        stats.left.words,
        stats.left.chars,
        escape_html(&options.right_title),
        stats.right.words,
        stats.right.chars,
    ));

    let table = to_html_table(report);
    let header = format!(
        "<table class=\"diff\">\n<tr><th></th><th>{}</th><th></th><th>{}</th></tr>\n",
        escape_html(&options.left_title),
        escape_html(&options.right_title)
    );
    output.push_str(&table.replacen("<table class=\"diff\">\n", &header, 1));
    output.push_str("</body>\n</html>\n");
    output
}
