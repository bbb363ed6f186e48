//! Prompt templates for the comparator.

use super::verdict::Mode;

/// System instruction sent with every request.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert reviewer for proposals and circulars, \
specializing in compliance analysis and approval decisions.";

/// Truncate `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Prompt for one pair of text spans, each cut to `ceiling` characters.
pub fn pair_prompt(mode: Mode, left: &str, right: &str, ceiling: usize) -> String {
    let left = truncate_chars(left, ceiling);
    let right = truncate_chars(right, ceiling);
    match mode {
        Mode::Approval => approval_prompt(left, right),
        Mode::ContentComparison => comparison_prompt(left, right),
    }
}

fn approval_prompt(circular: &str, proposal: &str) -> String {
    format!(
        "Document 1 is an official circular (policy, guideline, or communication). \
Document 2 is a proposal that claims to be based on Document 1.

Your task:
1. Read both documents carefully.
2. Decide whether the proposal can be approved strictly on the basis of the circular.
3. If it can, state \"APPROVED\" and briefly explain why.
4. If it cannot, state \"REJECTED\" and list the reasons, referencing specific requirements or gaps.

Document 1 (Circular):
{circular}

Document 2 (Proposal):
{proposal}

Answer in this format:
Decision: APPROVED or REJECTED

Explanation:
(your reasoning)

Key Points Analysis:
- Compliance with circular requirements
- Missing elements (if any)
- Alignment with stated policies
- Recommendations for improvement (if rejected)
"
    )
}

fn comparison_prompt(left: &str, right: &str) -> String {
    format!(
        "Compare the two document excerpts below and judge how they differ in meaning. \
Ignore formatting, whitespace, and pagination.

Document A:
{left}

Document B:
{right}

Answer in this format:
Verdict: IDENTICAL IN MEANING, MINOR EDITS ONLY, or SUBSTANTIVE DIFFERENCES

Explanation:
(the differences that matter, quoting both documents where useful)
"
    )
}

/// Prompt combining per-section answers into one decision.
pub fn synthesis_prompt(mode: Mode, answers: &[String], ceiling: usize) -> String {
    let mut sections = String::new();
    for (i, answer) in answers.iter().enumerate() {
        sections.push_str(&format!("--- Section {} ---\n{}\n\n", i + 1, answer.trim()));
    }
    let sections = truncate_chars(&sections, ceiling);

    let format_line = match mode {
        Mode::Approval => "Decision: APPROVED or REJECTED",
        Mode::ContentComparison => {
            "Verdict: IDENTICAL IN MEANING, MINOR EDITS ONLY, or SUBSTANTIVE DIFFERENCES"
        }
    };
    let rule = match mode {
        Mode::Approval => "The documents are approved only if every section is approved.",
        Mode::ContentComparison => {
            "Report the most significant difference found in any section."
        }
    };

    format!(
        "The documents were too long to review at once, so they were split into {count} \
sections and each section pair was reviewed separately. The reviews follow.

{sections}
Combine the reviews into one overall decision for the complete documents. {rule}

Answer in this format:
{format_line}

Explanation:
(your reasoning, naming the sections that drove the decision)
",
        count = answers.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_on_char_boundary() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
        assert_eq!(truncate_chars("日本語", 2), "日本");
    }

    #[test]
    fn test_pair_prompt_truncates_both_sides() {
        let left = "L".repeat(5000);
        let right = "R".repeat(5000);
        let prompt = pair_prompt(Mode::Approval, &left, &right, 3000);
        assert!(prompt.contains(&"L".repeat(3000)));
        assert!(!prompt.contains(&"L".repeat(3001)));
        assert!(prompt.contains(&"R".repeat(3000)));
        assert!(!prompt.contains(&"R".repeat(3001)));
        assert!(prompt.contains("Decision: APPROVED or REJECTED"));
    }

    #[test]
    fn test_comparison_prompt_format_line() {
        let prompt = pair_prompt(Mode::ContentComparison, "a", "b", 100);
        assert!(prompt.contains("Verdict: IDENTICAL IN MEANING"));
        assert!(prompt.contains("Document A:\na\n"));
        assert!(prompt.contains("Document B:\nb\n"));
    }

    #[test]
    fn test_synthesis_prompt_lists_sections() {
        let answers = vec!["Decision: APPROVED".to_string(), "Decision: REJECTED".to_string()];
        let prompt = synthesis_prompt(Mode::Approval, &answers, 6000);
        assert!(prompt.contains("split into 2 sections"));
        assert!(prompt.contains("--- Section 1 ---\nDecision: APPROVED"));
        assert!(prompt.contains("--- Section 2 ---\nDecision: REJECTED"));
    }
}
