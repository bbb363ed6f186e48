//! Model-assisted narrative comparison.
//!
//! [`NarrativeComparator`] splits both texts into chunks, asks a
//! [`CompletionService`] about each chunk pair in turn, and when more than
//! one pair was reviewed asks once more for a combined decision. Service
//! failures never escape: [`NarrativeComparator::assess`] always returns an
//! [`Assessment`], either a verdict or an error message.
//!
//! # Example
//!
//! ```
//! use doccompare::compare::{
//!     Assessment, CompletionRequest, CompletionService, ComparatorOptions,
//!     NarrativeComparator, ServiceError, Verdict,
//! };
//!
//! struct AlwaysApprove;
//!
//! impl CompletionService for AlwaysApprove {
//!     fn complete(&self, _: &CompletionRequest) -> Result<String, ServiceError> {
//!         Ok("Decision: APPROVED\n\nExplanation: meets every requirement.".into())
//!     }
//! }
//!
//! let comparator = NarrativeComparator::new(AlwaysApprove, ComparatorOptions::approval());
//! let assessment = comparator.assess("Circular text", "Proposal text");
//! assert_eq!(assessment.verdict(), Some(Verdict::Approved));
//! ```

mod prompt;
mod service;
mod verdict;

#[cfg(feature = "openai")]
mod openai;

pub use prompt::{pair_prompt, synthesis_prompt, truncate_chars, SYSTEM_INSTRUCTION};
pub use service::{ChatMessage, CompletionRequest, CompletionService, Role, ServiceError};
pub use verdict::{extract_verdict, Mode, Verdict};

#[cfg(feature = "openai")]
pub use openai::{OpenAiClient, ServiceConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

use crate::chunk::Chunker;
use serde::{Deserialize, Serialize};

/// Per-call character ceiling for approval checks.
pub const APPROVAL_CEILING: usize = 3000;

/// Per-call character ceiling for content comparison.
pub const COMPARISON_CEILING: usize = 6000;

/// Options for the narrative comparator.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparatorOptions {
    /// Comparison task
    pub mode: Mode,
    /// Chunk size in characters
    pub chunk_budget: usize,
    /// Hard limit on characters per text span sent in one call
    pub per_call_ceiling: usize,
    /// Maximum output tokens per call
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Model override passed to the service
    pub model: Option<String>,
}

impl Default for ComparatorOptions {
    fn default() -> Self {
        Self::approval()
    }
}

impl ComparatorOptions {
    /// Options for the given mode.
    pub fn for_mode(mode: Mode) -> Self {
        let ceiling = match mode {
            Mode::Approval => APPROVAL_CEILING,
            Mode::ContentComparison => COMPARISON_CEILING,
        };
        Self {
            mode,
            chunk_budget: ceiling,
            per_call_ceiling: ceiling,
            max_tokens: 1000,
            temperature: 0.2,
            model: None,
        }
    }

    /// Approval check: circular on the left, proposal on the right.
    pub fn approval() -> Self {
        Self::for_mode(Mode::Approval)
    }

    /// Meaning-level comparison of two documents.
    pub fn content_comparison() -> Self {
        Self::for_mode(Mode::ContentComparison)
    }

    /// Set the chunk size in characters (at least 1).
    pub fn with_chunk_budget(mut self, chars: usize) -> Self {
        self.chunk_budget = chars.max(1);
        self
    }

    /// Set the character limit for each side of one call.
    pub fn with_per_call_ceiling(mut self, chars: usize) -> Self {
        self.per_call_ceiling = chars;
        self
    }

    /// Set the maximum response length.
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = tokens;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override the service's default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Verdict for one chunk pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkVerdict {
    /// 0-based chunk pair index
    pub index: usize,
    /// Decision found in the response
    pub verdict: Verdict,
    /// Full response text
    pub reasoning: String,
}

/// Global verdict with supporting text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictReport {
    /// Comparison task
    pub mode: Mode,
    /// Global decision
    pub verdict: Verdict,
    /// Response text backing the global decision
    pub reasoning: String,
    /// Per-pair verdicts, in order
    pub chunks: Vec<ChunkVerdict>,
    /// Whether a synthesis call produced the global decision
    pub synthesized: bool,
}

/// Outcome of a comparison: a verdict or an error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assessment {
    Verdict(VerdictReport),
    Error(String),
}

impl Assessment {
    /// The global verdict, if the comparison succeeded.
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            Assessment::Verdict(report) => Some(report.verdict),
            Assessment::Error(_) => None,
        }
    }

    /// Check if the service call failed.
    pub fn is_error(&self) -> bool {
        matches!(self, Assessment::Error(_))
    }

    /// Reasoning text, or the error message.
    pub fn text(&self) -> &str {
        match self {
            Assessment::Verdict(report) => &report.reasoning,
            Assessment::Error(message) => message,
        }
    }
}

/// Chunked comparator backed by a completion service.
pub struct NarrativeComparator<S> {
    service: S,
    options: ComparatorOptions,
    chunker: Chunker,
}

impl<S: CompletionService> NarrativeComparator<S> {
    /// Create a comparator.
    pub fn new(service: S, options: ComparatorOptions) -> Self {
        let chunker = Chunker::with_max_chars(options.chunk_budget);
        Self {
            service,
            options,
            chunker,
        }
    }

    /// The options this comparator runs with.
    pub fn options(&self) -> &ComparatorOptions {
        &self.options
    }

    /// Compare two texts. Calls are issued one at a time.
    pub fn assess(&self, left: &str, right: &str) -> Assessment {
        match self.run(left, right) {
            Ok(report) => Assessment::Verdict(report),
            Err(e) => {
                log::warn!("completion service failed: {}", e);
                Assessment::Error(format!("Error analyzing documents: {}", e))
            }
        }
    }

    fn run(&self, left: &str, right: &str) -> Result<VerdictReport, ServiceError> {
        let mode = self.options.mode;
        let left_chunks = self.chunker.split(left);
        let right_chunks = self.chunker.split(right);
        let pairs = left_chunks.len().max(right_chunks.len());
        log::debug!(
            "{:?}: {} left chunks, {} right chunks",
            mode,
            left_chunks.len(),
            right_chunks.len()
        );

        let mut chunks = Vec::with_capacity(pairs);
        for index in 0..pairs {
            let l = left_chunks.get(index).map_or("", |c| c.text.as_str());
            let r = right_chunks.get(index).map_or("", |c| c.text.as_str());
            let prompt = pair_prompt(mode, l, r, self.options.per_call_ceiling);
            let response = self.call(prompt, index)?;
            chunks.push(ChunkVerdict {
                index,
                verdict: extract_verdict(&response, mode),
                reasoning: response,
            });
        }

        if let [only] = chunks.as_slice() {
            return Ok(VerdictReport {
                mode,
                verdict: only.verdict,
                reasoning: only.reasoning.clone(),
                chunks,
                synthesized: false,
            });
        }

        let answers: Vec<String> = chunks.iter().map(|c| c.reasoning.clone()).collect();
        let prompt = synthesis_prompt(mode, &answers, 2 * self.options.per_call_ceiling);
        let response = self.call(prompt, pairs)?;

        Ok(VerdictReport {
            mode,
            verdict: extract_verdict(&response, mode),
            reasoning: response,
            chunks,
            synthesized: true,
        })
    }

    fn call(&self, prompt: String, index: usize) -> Result<String, ServiceError> {
        log::debug!(
            "{:?} call {}: {} prompt chars",
            self.options.mode,
            index,
            prompt.chars().count()
        );
        let request = CompletionRequest {
            model: self.options.model.clone(),
            messages: vec![ChatMessage::system(SYSTEM_INSTRUCTION), ChatMessage::user(prompt)],
            max_tokens: self.options.max_tokens,
            temperature: self.options.temperature,
        };
        self.service.complete(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct Scripted {
        responses: RefCell<VecDeque<Result<String, ServiceError>>>,
        requests: RefCell<Vec<CompletionRequest>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<String, ServiceError>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl CompletionService for Scripted {
        fn complete(&self, request: &CompletionRequest) -> Result<String, ServiceError> {
            self.requests.borrow_mut().push(request.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ServiceError::Transport("script exhausted".into())))
        }
    }

    #[test]
    fn test_option_builders() {
        let options = ComparatorOptions::content_comparison()
            .with_chunk_budget(0)
            .with_per_call_ceiling(500)
            .with_max_tokens(200)
            .with_temperature(0.1)
            .with_model("local-model");
        assert_eq!(options.chunk_budget, 1);
        assert_eq!(options.per_call_ceiling, 500);
        assert_eq!(options.max_tokens, 200);
        assert_eq!(options.model.as_deref(), Some("local-model"));

        let service = Scripted::new(Vec::new());
        let comparator = NarrativeComparator::new(&service, options);
        assert_eq!(comparator.options().mode, Mode::ContentComparison);
        assert_eq!(comparator.options().temperature, 0.1);
    }

    #[test]
    fn test_single_pair_no_synthesis() {
        let service = Scripted::new(vec![Ok("Decision: REJECTED\nMissing budget.".into())]);
        let comparator = NarrativeComparator::new(&service, ComparatorOptions::approval());
        let assessment = comparator.assess("circular", "proposal");

        let Assessment::Verdict(report) = assessment else {
            panic!("expected verdict");
        };
        assert_eq!(report.verdict, Verdict::Rejected);
        assert!(!report.synthesized);
        assert_eq!(report.chunks.len(), 1);

        let requests = service.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages[0].role, Role::System);
        assert_eq!(requests[0].messages[0].content, SYSTEM_INSTRUCTION);
        assert_eq!(requests[0].max_tokens, 1000);
        assert!(requests[0].prompt().contains("circular"));
    }

    #[test]
    fn test_multiple_pairs_are_synthesized() {
        let service = Scripted::new(vec![
            Ok("Verdict: IDENTICAL IN MEANING".into()),
            Ok("Verdict: MINOR EDITS ONLY".into()),
            Ok("Verdict: MINOR EDITS ONLY\nOnly wording changed.".into()),
        ]);
        let options = ComparatorOptions::content_comparison().with_chunk_budget(10);
        let comparator = NarrativeComparator::new(&service, options);
        let assessment = comparator.assess("first para\n\nsecond one", "first para\n\nsecond 1");

        assert_eq!(assessment.verdict(), Some(Verdict::MinorEditsOnly));
        let Assessment::Verdict(report) = assessment else {
            unreachable!()
        };
        assert!(report.synthesized);
        assert_eq!(report.chunks[0].verdict, Verdict::IdenticalInMeaning);
        assert_eq!(report.chunks[1].verdict, Verdict::MinorEditsOnly);

        let requests = service.requests.borrow();
        assert_eq!(requests.len(), 3);
        assert!(requests[2].prompt().contains("--- Section 2 ---"));
    }

    #[test]
    fn test_uneven_chunk_counts_pair_with_empty() {
        let service = Scripted::new(vec![
            Ok("Decision: APPROVED".into()),
            Ok("Decision: REJECTED".into()),
            Ok("Decision: REJECTED".into()),
        ]);
        let options = ComparatorOptions::approval().with_chunk_budget(5);
        let comparator = NarrativeComparator::new(&service, options);
        let assessment = comparator.assess("short", "alpha\n\nbeta");

        assert_eq!(assessment.verdict(), Some(Verdict::Rejected));
        let requests = service.requests.borrow();
        assert!(requests[1].prompt().contains("Document 1 (Circular):\n\n"));
        assert!(requests[1].prompt().contains("beta"));
    }

    #[test]
    fn test_service_failure_becomes_error() {
        let service = Scripted::new(vec![Err(ServiceError::Transport(
            "connection refused".into(),
        ))]);
        let comparator = NarrativeComparator::new(&service, ComparatorOptions::approval());
        let assessment = comparator.assess("a", "b");

        assert!(assessment.is_error());
        assert_eq!(
            assessment.text(),
            "Error analyzing documents: transport error: connection refused"
        );
    }

    #[test]
    fn test_failure_in_synthesis_becomes_error() {
        let service = Scripted::new(vec![
            Ok("Decision: APPROVED".into()),
            Ok("Decision: APPROVED".into()),
        ]);
        let options = ComparatorOptions::approval().with_chunk_budget(5);
        let comparator = NarrativeComparator::new(&service, options);
        let assessment = comparator.assess("alpha\n\nbeta", "alpha\n\nbeta");
        assert!(assessment.is_error());
    }

    #[test]
    fn test_unrecognized_response_is_indeterminate() {
        let service = Scripted::new(vec![Ok("I cannot decide.".into())]);
        let comparator = NarrativeComparator::new(&service, ComparatorOptions::approval());
        assert_eq!(
            comparator.assess("a", "b").verdict(),
            Some(Verdict::Indeterminate)
        );
    }

    #[test]
    fn test_assessment_json() {
        let json = serde_json::to_string(&Assessment::Error("boom".into())).unwrap();
        assert_eq!(json, r#"{"error":"boom"}"#);
    }
}
