//! Approval report for the circular/proposal check.

use serde::{Deserialize, Serialize};

use crate::compare::{Assessment, Verdict};
use crate::model::{Document, DocumentStats};

/// Outcome of an approval check, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalReport {
    /// Circular name
    pub circular: String,
    /// Proposal name
    pub proposal: String,
    /// Model assessment
    pub assessment: Assessment,
    /// Circular word and character counts
    pub circular_stats: DocumentStats,
    /// Proposal word and character counts
    pub proposal_stats: DocumentStats,
}

impl ApprovalReport {
    /// Build a report for a circular/proposal pair.
    pub fn new(circular: &Document, proposal: &Document, assessment: Assessment) -> Self {
        Self {
            circular: circular.metadata.name.clone(),
            proposal: proposal.metadata.name.clone(),
            assessment,
            circular_stats: circular.stats(),
            proposal_stats: proposal.stats(),
        }
    }

    /// Headline label for the decision.
    pub fn decision_label(&self) -> &'static str {
        match self.assessment.verdict() {
            Some(Verdict::Approved) => "PROPOSAL APPROVED",
            Some(Verdict::Rejected) => "PROPOSAL REJECTED",
            Some(_) => "DECISION UNCLEAR",
            None => "ANALYSIS FAILED",
        }
    }

    /// Render the report as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();
        output.push_str("# Approval Decision\n\n");
        output.push_str(&format!("**{}**\n\n", self.decision_label()));
        output.push_str(&format!(
            "Circular: {}  \nProposal: {}\n\n",
            self.circular, self.proposal
        ));

        output.push_str("## Analysis\n\n");
        output.push_str(self.assessment.text().trim());
        output.push_str("\n\n");

        output.push_str("## Document Statistics\n\n");
        output.push_str("| Metric | Value |\n|---|---|\n");
        output.push_str(&format!(
            "| Circular length | {} words |\n",
            group_thousands(self.circular_stats.words)
        ));
        output.push_str(&format!(
            "| Proposal length | {} words |\n",
            group_thousands(self.proposal_stats.words)
        ));
        output.push_str(&format!(
            "| Circular characters | {} |\n",
            group_thousands(self.circular_stats.chars)
        ));
        output.push_str(&format!(
            "| Proposal characters | {} |\n",
            group_thousands(self.proposal_stats.chars)
        ));
        output
    }
}

/// Format a count with `,` between groups of three digits.
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut output = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            output.push(',');
        }
        output.push(c);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{Mode, VerdictReport};

    fn verdict(verdict: Verdict, reasoning: &str) -> Assessment {
        Assessment::Verdict(VerdictReport {
            mode: Mode::Approval,
            verdict,
            reasoning: reasoning.to_string(),
            chunks: Vec::new(),
            synthesized: false,
        })
    }

    #[test]
    fn test_decision_labels() {
        let circular = Document::from_text("circular.txt", "one two three");
        let proposal = Document::from_text("proposal.txt", "four five");

        let report = ApprovalReport::new(&circular, &proposal, verdict(Verdict::Approved, ""));
        assert_eq!(report.decision_label(), "PROPOSAL APPROVED");

        let report = ApprovalReport::new(&circular, &proposal, verdict(Verdict::Rejected, ""));
        assert_eq!(report.decision_label(), "PROPOSAL REJECTED");

        let report =
            ApprovalReport::new(&circular, &proposal, verdict(Verdict::Indeterminate, ""));
        assert_eq!(report.decision_label(), "DECISION UNCLEAR");

        let report = ApprovalReport::new(&circular, &proposal, Assessment::Error("x".into()));
        assert_eq!(report.decision_label(), "ANALYSIS FAILED");
    }

    #[test]
    fn test_markdown_contents() {
        let circular = Document::from_text("circular.txt", "one two three");
        let proposal = Document::from_text("proposal.txt", "four five");
        let report = ApprovalReport::new(
            &circular,
            &proposal,
            verdict(Verdict::Approved, "Decision: APPROVED\n\nExplanation: fine."),
        );
        let markdown = report.to_markdown();

        assert!(markdown.contains("**PROPOSAL APPROVED**"));
        assert!(markdown.contains("Explanation: fine."));
        assert!(markdown.contains("| Circular length | 3 words |"));
        assert!(markdown.contains("| Proposal length | 2 words |"));
        assert!(markdown.contains("| Circular characters | 13 |"));
        assert!(markdown.contains("| Proposal characters | 9 |"));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
