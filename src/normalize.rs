//! Text normalization pipeline.
//!
//! Turns raw extracted text into a canonical form for comparison:
//!
//! 1. Line endings (`\r\n`, `\r`, NEL, U+2028/2029) become `\n`.
//! 2. Optional Unicode NFC and ligature repair ([`NormalizePreset::Strict`]).
//! 3. Horizontal whitespace runs collapse to one space; line edges are trimmed.
//! 4. Short lines repeated many times (running headers and footers) are removed.
//! 5. Long runs of blank lines collapse to a single blank line.
//! 6. Leading and trailing whitespace is trimmed.
//!
//! Whitespace is collapsed before boilerplate lines are counted so that
//! `normalize(normalize(t)) == normalize(t)` holds for every input.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Normalization preset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizePreset {
    /// Whitespace, boilerplate, and blank-line cleanup
    #[default]
    Standard,
    /// Standard plus Unicode NFC and ligature repair
    Strict,
}

/// Options for text normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Replace typographic ligatures (ﬁ, ﬂ, ...) with their letters
    pub fix_ligatures: bool,

    /// Collapse horizontal whitespace and trim line edges
    pub collapse_whitespace: bool,

    /// Remove repeated header/footer lines
    pub remove_boilerplate: bool,

    /// A line must occur at least this many times to count as boilerplate
    pub boilerplate_min_repeats: usize,

    /// Lines longer than this (in characters) are never boilerplate
    pub boilerplate_max_len: usize,

    /// Runs of at least this many blank lines are collapsed (0 = never)
    pub blank_run_threshold: usize,

    /// Blank lines left in place of a collapsed run
    pub max_blank_lines: usize,
}

impl NormalizeOptions {
    /// Create options from a preset.
    pub fn from_preset(preset: NormalizePreset) -> Self {
        match preset {
            NormalizePreset::Standard => Self::standard(),
            NormalizePreset::Strict => Self::strict(),
        }
    }

    /// Standard normalization options.
    pub fn standard() -> Self {
        Self {
            normalize_unicode: false,
            fix_ligatures: false,
            collapse_whitespace: true,
            remove_boilerplate: true,
            boilerplate_min_repeats: 5,
            boilerplate_max_len: 80,
            blank_run_threshold: 3,
            max_blank_lines: 1,
        }
    }

    /// Strict normalization: standard plus NFC and ligature repair.
    pub fn strict() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: true,
            ..Self::standard()
        }
    }

    /// Set the boilerplate detection thresholds.
    pub fn with_boilerplate(mut self, min_repeats: usize, max_len: usize) -> Self {
        self.boilerplate_min_repeats = min_repeats;
        self.boilerplate_max_len = max_len;
        self
    }

    /// Enable or disable boilerplate removal.
    pub fn with_boilerplate_removal(mut self, remove: bool) -> Self {
        self.remove_boilerplate = remove;
        self
    }

    /// Set the blank-line collapse threshold.
    pub fn with_blank_run_threshold(mut self, threshold: usize) -> Self {
        self.blank_run_threshold = threshold;
        self
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self::standard()
    }
}

const LIGATURES: [(&str, &str); 7] = [
    ("\u{FB00}", "ff"),
    ("\u{FB01}", "fi"),
    ("\u{FB02}", "fl"),
    ("\u{FB03}", "ffi"),
    ("\u{FB04}", "ffl"),
    ("\u{FB05}", "st"),
    ("\u{FB06}", "st"),
];

fn horizontal_whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\p{Zs}\t\x0B\x0C]+").expect("static pattern"))
}

/// Text normalization pipeline.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    /// Create a new normalizer with the given options.
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Create a normalizer from a preset.
    pub fn from_preset(preset: NormalizePreset) -> Self {
        Self::new(NormalizeOptions::from_preset(preset))
    }

    /// The options this normalizer runs with.
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Process text through the pipeline.
    pub fn process(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let mut result = unify_line_endings(text);

        if self.options.normalize_unicode {
            result = result.nfc().collect();
        }

        if self.options.fix_ligatures {
            for (ligature, replacement) in LIGATURES {
                result = result.replace(ligature, replacement);
            }
        }

        let mut lines: Vec<String> = if self.options.collapse_whitespace {
            result.split('\n').map(collapse_line).collect()
        } else {
            result.split('\n').map(str::to_string).collect()
        };

        if self.options.remove_boilerplate {
            lines = self.remove_boilerplate(lines);
        }

        if self.options.blank_run_threshold > 0 {
            lines = self.collapse_blank_runs(lines);
        }

        lines.join("\n").trim().to_string()
    }

    /// Drop every occurrence of short lines that recur often enough to be
    /// running headers or footers. Blank lines never qualify.
    fn remove_boilerplate(&self, lines: Vec<String>) -> Vec<String> {
        let min_repeats = self.options.boilerplate_min_repeats.max(1);
        let max_len = self.options.boilerplate_max_len;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for line in &lines {
            if !line.trim().is_empty() && line.chars().count() <= max_len {
                *counts.entry(line.as_str()).or_insert(0) += 1;
            }
        }

        let boilerplate: HashSet<String> = counts
            .into_iter()
            .filter(|(_, count)| *count >= min_repeats)
            .map(|(line, _)| line.to_string())
            .collect();

        if boilerplate.is_empty() {
            return lines;
        }

        for line in &boilerplate {
            log::debug!("removing boilerplate line: {:?}", line);
        }

        lines
            .into_iter()
            .filter(|line| !boilerplate.contains(line))
            .collect()
    }

    fn collapse_blank_runs(&self, lines: Vec<String>) -> Vec<String> {
        let threshold = self.options.blank_run_threshold;
        let keep = self.options.max_blank_lines;

        let mut output = Vec::with_capacity(lines.len());
        let mut run = 0usize;

        for line in lines {
            if line.trim().is_empty() {
                run += 1;
                continue;
            }
            let blanks = if run >= threshold { keep } else { run };
            output.extend(std::iter::repeat(String::new()).take(blanks));
            run = 0;
            output.push(line);
        }

        let blanks = if run >= threshold { keep } else { run };
        output.extend(std::iter::repeat(String::new()).take(blanks));
        output
    }
}

/// Normalize text with the standard options.
pub fn normalize(text: &str) -> String {
    Normalizer::default().process(text)
}

/// Convert every line terminator to `\n`.
pub fn unify_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace(['\r', '\u{0085}', '\u{2028}', '\u{2029}'], "\n")
}

fn collapse_line(line: &str) -> String {
    horizontal_whitespace()
        .replace_all(line, " ")
        .trim_matches(' ')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_idempotent(text: &str) {
        let once = normalize(text);
        let twice = normalize(&once);
        assert_eq!(once, twice, "not idempotent for {:?}", text);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\n \t "), "");
    }

    #[test]
    fn test_line_endings() {
        assert_eq!(normalize("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_whitespace_collapse() {
        let text = "  The   circular\t\tstates\u{00A0}\u{00A0}that  \nfunds   apply ";
        assert_eq!(normalize(text), "The circular states that\nfunds apply");
    }

    #[test]
    fn test_boilerplate_removed() {
        let header = "Confidential — Internal Use Only";
        let mut lines = Vec::new();
        for i in 0..44 {
            lines.push(format!("Clause {} of the agreement.", i));
            if i % 8 == 0 {
                lines.push(header.to_string());
            }
        }
        assert_eq!(lines.len(), 50);
        assert_eq!(lines.iter().filter(|l| *l == header).count(), 6);

        let result = normalize(&lines.join("\n"));
        assert!(!result.contains(header));
        assert!(result.contains("Clause 0 of the agreement."));
        assert!(result.contains("Clause 43 of the agreement."));
    }

    #[test]
    fn test_boilerplate_below_threshold_kept() {
        let text = ["Page header", "a", "Page header", "b", "Page header", "c", "Page header"]
            .join("\n");
        assert_eq!(normalize(&text).matches("Page header").count(), 4);
    }

    #[test]
    fn test_long_repeated_line_kept() {
        let long = "x".repeat(81);
        let text = vec![long.as_str(); 6].join("\n");
        assert_eq!(normalize(&text).lines().count(), 6);
    }

    #[test]
    fn test_boilerplate_thresholds_configurable() {
        let normalizer =
            Normalizer::new(NormalizeOptions::standard().with_boilerplate(2, 80));
        let text = "Footer\nbody one\nFooter\nbody two";
        assert_eq!(normalizer.process(text), "body one\nbody two");

        let disabled =
            Normalizer::new(NormalizeOptions::standard().with_boilerplate_removal(false));
        let repeated = vec!["Footer"; 6].join("\n");
        assert_eq!(disabled.process(&repeated).lines().count(), 6);
    }

    #[test]
    fn test_blank_runs() {
        // three or more blank lines collapse to one
        assert_eq!(normalize("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize("a\n\n\n\n\n\n\nb"), "a\n\nb");
        // shorter runs are left alone
        assert_eq!(normalize("a\n\nb"), "a\n\nb");
        assert_eq!(normalize("a\n\n\nb"), "a\n\n\nb");
        // whitespace-only lines count as blank
        assert_eq!(normalize("a\n \n\t\n  \nb"), "a\n\nb");
    }

    #[test]
    fn test_strict_preset() {
        let normalizer = Normalizer::from_preset(NormalizePreset::Strict);
        assert_eq!(normalizer.process("ﬁnding ﬂowers"), "finding flowers");
        assert_eq!(normalizer.process("cafe\u{301}"), "caf\u{e9}");

        let standard = Normalizer::default();
        assert_eq!(standard.process("ﬁnding"), "ﬁnding");
    }

    #[test]
    fn test_idempotent() {
        assert_idempotent("");
        assert_idempotent("Hello world\nFoo bar");
        assert_idempotent("  lead\n\n\n\n\ntrail  \r\n");
        assert_idempotent("x\n \n \n \n \ny");
        // lines that only become identical after whitespace collapse
        assert_idempotent("Hdr\n Hdr\nHdr \nHdr\n  Hdr\nbody");
        // removal that opens up a long blank run
        assert_idempotent("a\n\nH\nH\n\nH\nH\nH\n\nb");
        assert_idempotent("\u{2028}line\u{0085}next\u{3000}\u{3000}word");
    }

    #[test]
    fn test_strict_idempotent() {
        let normalizer = Normalizer::from_preset(NormalizePreset::Strict);
        for text in ["ﬃ  cafe\u{301}\n\n\n\nx", "a\u{308}\n\u{301}b"] {
            let once = normalizer.process(text);
            assert_eq!(normalizer.process(&once), once);
        }
    }
}
