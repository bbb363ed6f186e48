//! JSON rendering of reports.

use serde::Serialize;

use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a report (diff, assessment, approval, document) to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff_texts;

    #[test]
    fn test_diff_report_pretty() {
        let report = diff_texts("Hello world", "Hello there");
        let json = to_json(&report, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"kind\": \"changed\""));
        assert!(json.contains("\"exact_match\": false"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_compact_has_no_newlines() {
        let report = diff_texts("a\nb", "a\nb");
        let json = to_json(&report, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"left_number\":1"));
    }
}
