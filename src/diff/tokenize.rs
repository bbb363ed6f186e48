//! Word-level tokenization of a line.

use regex::Regex;
use std::sync::OnceLock;

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[\p{L}\p{M}\p{N}]+|\s+|[^\p{L}\p{M}\p{N}\s]").expect("static pattern")
    })
}

/// Split a line into tokens: runs of letters/digits, runs of whitespace,
/// and single punctuation or symbol characters.
///
/// Concatenating the tokens yields the line again, so rendering a token
/// diff reproduces both lines exactly.
pub fn tokenize(line: &str) -> Vec<&str> {
    token_regex().find_iter(line).map(|m| m.as_str()).collect()
}
