//! Decision labels and their extraction from free-form model output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Can the proposal (right) be approved on the basis of the circular (left)?
    #[default]
    Approval,
    /// How do the two documents differ in meaning?
    ContentComparison,
}

impl Mode {
    /// The label that starts the decision line of a response.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Approval => "Decision",
            Mode::ContentComparison => "Verdict",
        }
    }

    /// Verdicts a response may state in this mode.
    pub fn vocabulary(&self) -> &'static [Verdict] {
        match self {
            Mode::Approval => &[Verdict::Approved, Verdict::Rejected],
            Mode::ContentComparison => &[
                Verdict::IdenticalInMeaning,
                Verdict::MinorEditsOnly,
                Verdict::SubstantiveDifferences,
            ],
        }
    }
}

/// Closed set of decision labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Approved,
    Rejected,
    IdenticalInMeaning,
    MinorEditsOnly,
    SubstantiveDifferences,
    /// No recognizable decision line was found
    Indeterminate,
}

impl Verdict {
    /// The literal token a response uses for this verdict.
    pub fn token(&self) -> &'static str {
        match self {
            Verdict::Approved => "APPROVED",
            Verdict::Rejected => "REJECTED",
            Verdict::IdenticalInMeaning => "IDENTICAL IN MEANING",
            Verdict::MinorEditsOnly => "MINOR EDITS ONLY",
            Verdict::SubstantiveDifferences => "SUBSTANTIVE DIFFERENCES",
            Verdict::Indeterminate => "INDETERMINATE",
        }
    }

    /// Check if a decision was recognized.
    pub fn is_determinate(&self) -> bool {
        *self != Verdict::Indeterminate
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Find the decision in a model response.
///
/// Scans for the first line that starts with the mode's label (`Decision`
/// or `Verdict`, case-insensitive, Markdown emphasis ignored) followed by
/// `:` and classifies the text after it. Verdict tokens only match as
/// whole words. A line naming more than one verdict or a verdict preceded
/// by `NOT` is [`Verdict::Indeterminate`], as is a response with no
/// recognizable decision line.
pub fn extract_verdict(response: &str, mode: Mode) -> Verdict {
    let label = mode.label();

    for line in response.lines() {
        let line = line.trim_start_matches(|c: char| c.is_whitespace() || "*_#>-".contains(c));
        let Some(head) = line.get(..label.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(label) {
            continue;
        }
        let rest = line[label.len()..].trim_start_matches(['*', '_', ' ']);
        let Some(value) = rest.strip_prefix(':') else {
            continue;
        };
        return classify(value, mode);
    }

    Verdict::Indeterminate
}

/// Match vocabulary tokens as whole-word sequences. A negated token or
/// more than one distinct verdict leaves the decision open.
fn classify(value: &str, mode: Mode) -> Verdict {
    let value = value.to_uppercase();
    let words: Vec<&str> = value
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();

    let mut found: Option<Verdict> = None;
    for verdict in mode.vocabulary() {
        let token: Vec<&str> = verdict.token().split(' ').collect();
        for (at, window) in words.windows(token.len()).enumerate() {
            if window != token.as_slice() {
                continue;
            }
            if at > 0 && words[at - 1] == "NOT" {
                return Verdict::Indeterminate;
            }
            match found {
                Some(previous) if previous != *verdict => return Verdict::Indeterminate,
                _ => found = Some(*verdict),
            }
        }
    }

    found.unwrap_or(Verdict::Indeterminate)
}
