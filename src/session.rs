//! Request-scoped comparison context.
//!
//! A [`ComparisonSession`] owns the two documents of one request along with
//! the normalizer applied to them. Everything computed from it is returned
//! to the caller, and dropping the session discards the documents.

use std::path::Path;
use std::sync::OnceLock;

use crate::compare::{Assessment, ComparatorOptions, CompletionService, NarrativeComparator};
use crate::diff::{DiffEngine, DiffOptions, DiffReport};
use crate::error::Result;
use crate::extract::ExtractorRegistry;
use crate::model::Document;
use crate::normalize::Normalizer;
use crate::render::ApprovalReport;

/// Two documents being compared.
///
/// In approval mode the left document is the circular and the right
/// document is the proposal.
#[derive(Debug)]
pub struct ComparisonSession {
    left: Document,
    right: Document,
    normalizer: Normalizer,
    /// Both texts under `normalizer`, computed on first use
    normalized: OnceLock<(String, String)>,
}

impl ComparisonSession {
    /// Create a session over two extracted documents.
    pub fn new(left: Document, right: Document) -> Self {
        Self {
            left,
            right,
            normalizer: Normalizer::default(),
            normalized: OnceLock::new(),
        }
    }

    /// Extract both files in parallel with the default extractors.
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(left: P, right: Q) -> Result<Self> {
        Self::from_files_with(&ExtractorRegistry::with_defaults(), left, right)
    }

    /// Extract both files in parallel with a custom registry.
    pub fn from_files_with<P: AsRef<Path>, Q: AsRef<Path>>(
        registry: &ExtractorRegistry,
        left: P,
        right: Q,
    ) -> Result<Self> {
        let (left, right) = (left.as_ref(), right.as_ref());
        let (left, right) = rayon::join(
            || registry.extract_file(left),
            || registry.extract_file(right),
        );
        Ok(Self::new(left?, right?))
    }

    /// Use a specific normalizer for diffing and model calls.
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self.normalized = OnceLock::new();
        self
    }

    pub fn left(&self) -> &Document {
        &self.left
    }

    pub fn right(&self) -> &Document {
        &self.right
    }

    /// Side-by-side diff of the raw texts, or of the normalized texts when
    /// `normalized` is set.
    pub fn diff(&self, normalized: bool) -> DiffReport {
        let engine = DiffEngine::new(DiffOptions::new());
        if normalized {
            engine.diff(self.normalized_left(), self.normalized_right())
        } else {
            engine.diff(self.left.text(), self.right.text())
        }
    }

    /// Check whether the proposal can be approved on the basis of the
    /// circular.
    pub fn approve<S: CompletionService>(&self, service: S) -> ApprovalReport {
        self.approve_with(service, ComparatorOptions::approval())
    }

    /// Approval check with custom comparator options.
    pub fn approve_with<S: CompletionService>(
        &self,
        service: S,
        options: ComparatorOptions,
    ) -> ApprovalReport {
        let assessment = self.assess(service, options);
        ApprovalReport::new(&self.left, &self.right, assessment)
    }

    /// Meaning-level comparison of the two documents.
    pub fn compare_content<S: CompletionService>(&self, service: S) -> Assessment {
        self.assess(service, ComparatorOptions::content_comparison())
    }

    /// Run the comparator in any mode over the normalized texts.
    pub fn assess<S: CompletionService>(&self, service: S, options: ComparatorOptions) -> Assessment {
        log::debug!(
            "assessing {} against {} ({:?})",
            self.right.metadata.name,
            self.left.metadata.name,
            options.mode
        );
        NarrativeComparator::new(service, options)
            .assess(self.normalized_left(), self.normalized_right())
    }

    fn normalized_pair(&self) -> &(String, String) {
        self.normalized.get_or_init(|| {
            (
                self.left.normalized_with(&self.normalizer).into_owned(),
                self.right.normalized_with(&self.normalizer).into_owned(),
            )
        })
    }

    fn normalized_left(&self) -> &str {
        &self.normalized_pair().0
    }

    fn normalized_right(&self) -> &str {
        &self.normalized_pair().1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{CompletionRequest, ServiceError, Verdict};
    use crate::normalize::NormalizePreset;
    use std::cell::RefCell;

    struct Recorder {
        reply: &'static str,
        prompts: RefCell<Vec<String>>,
    }

    impl CompletionService for Recorder {
        fn complete(&self, request: &CompletionRequest) -> std::result::Result<String, ServiceError> {
            self.prompts.borrow_mut().push(request.prompt().to_string());
            Ok(self.reply.to_string())
        }
    }

    fn session() -> ComparisonSession {
        ComparisonSession::new(
            Document::from_text("circular.txt", "Grants  up to 500.\r\nApply by June."),
            Document::from_text("proposal.txt", "Grants up to 500.\nApply by July."),
        )
    }

    #[test]
    fn test_raw_and_normalized_diff() {
        let session = session();
        let raw = session.diff(false);
        assert_eq!(raw.stats.changed_rows, 2);

        let normalized = session.diff(true);
        assert_eq!(normalized.stats.changed_rows, 1);
        assert_eq!(normalized.rows[1].left, "Apply by <del>June</del>.");
    }

    #[test]
    fn test_approve_uses_normalized_text() {
        let service = Recorder {
            reply: "Decision: REJECTED\nDeadline differs.",
            prompts: RefCell::new(Vec::new()),
        };
        let session = session();
        let report = session.approve(&service);

        assert_eq!(report.decision_label(), "PROPOSAL REJECTED");
        assert_eq!(report.circular, "circular.txt");
        assert_eq!(report.proposal_stats.words, 7);
        let prompts = service.prompts.borrow();
        assert!(prompts[0].contains("Grants up to 500.\nApply by June."));
    }

    #[test]
    fn test_normalizer_change_after_default_normalization() {
        let left = Document::from_text("left.txt", "\u{FB01}nding");
        let right = Document::from_text("right.txt", "finding");
        assert_eq!(left.normalized(), "\u{FB01}nding");

        let session = ComparisonSession::new(left, right);
        assert_eq!(session.diff(true).stats.changed_rows, 1);

        let session = session.with_normalizer(Normalizer::from_preset(NormalizePreset::Strict));
        let report = session.diff(true);
        assert_eq!(report.stats.changed_rows, 0);
        assert!(report.stats.exact_match);
    }

    #[test]
    fn test_compare_content() {
        let service = Recorder {
            reply: "Verdict: MINOR EDITS ONLY",
            prompts: RefCell::new(Vec::new()),
        };
        let assessment = session().compare_content(&service);
        assert_eq!(assessment.verdict(), Some(Verdict::MinorEditsOnly));
    }
}
