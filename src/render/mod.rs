//! Rendering of diff and approval reports for display.

mod html;
mod json;
mod report;

pub use html::{to_html_page, to_html_table, HtmlOptions};
pub use json::{to_json, JsonFormat};
pub use report::ApprovalReport;
