//! Grounding validation port.
//!
//! Decides whether a generated answer is supported by the retrieved context.
//! Implementations are heuristics; a passing report is not a proof of
//! correctness.

use crate::domain::models::ScoredResult;

/// Outcome of a grounding check
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroundingReport {
    /// Whether the answer is considered supported by the context
    pub grounded: bool,

    /// Answer terms with no support in the context, in order of appearance
    pub unsupported_terms: Vec<String>,
}

impl GroundingReport {
    pub fn grounded(unsupported_terms: Vec<String>) -> Self {
        Self {
            grounded: true,
            unsupported_terms,
        }
    }

    pub fn ungrounded(unsupported_terms: Vec<String>) -> Self {
        Self {
            grounded: false,
            unsupported_terms,
        }
    }
}

/// Capability interface for grounding checks
pub trait GroundingValidator: Send + Sync {
    /// Validator name used in logs.
    fn name(&self) -> &'static str;

    /// Check `answer` against the `context` it was generated from.
    fn validate(&self, answer: &str, context: &[ScoredResult]) -> GroundingReport;
}
