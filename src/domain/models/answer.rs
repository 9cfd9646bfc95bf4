//! Answer models
//!
//! The terminal state of a question and the text handed back to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::embedding::ScoredResult;

/// Why a question ended in the fallback response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FallbackReason {
    /// No chunk scored above the retrieval threshold
    NoContext,

    /// The best match did not clear the stricter generation threshold
    LowConfidence { best_similarity: f32 },

    /// The generated answer used too many terms absent from the context
    Ungrounded { unsupported_terms: Vec<String> },

    /// Retrieval or generation failed after retries
    BackendError { message: String },
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoContext => write!(f, "no relevant context"),
            Self::LowConfidence { best_similarity } => {
                write!(f, "low confidence (best similarity {best_similarity:.3})")
            }
            Self::Ungrounded { unsupported_terms } => {
                write!(f, "ungrounded answer ({})", unsupported_terms.join(", "))
            }
            Self::BackendError { message } => write!(f, "backend error: {message}"),
        }
    }
}

/// Terminal state of a single question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnswerStatus {
    Answered,
    Fallback(FallbackReason),
}

impl AnswerStatus {
    pub fn is_answered(&self) -> bool {
        matches!(self, Self::Answered)
    }
}

/// Reference to a chunk used as context for an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReference {
    pub source: String,
    pub position: usize,
    pub similarity: f32,
    pub excerpt: String,
}

impl From<&ScoredResult> for SourceReference {
    fn from(result: &ScoredResult) -> Self {
        Self {
            source: result.chunk.source().to_string(),
            position: result.chunk.position(),
            similarity: result.similarity,
            excerpt: result.chunk.preview(),
        }
    }
}

/// Answer handed back to callers of the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    /// Final answer text (possibly the fallback response)
    pub text: String,

    /// How the question terminated
    pub status: AnswerStatus,

    /// Context chunks retrieved for the question, best first
    pub sources: Vec<SourceReference>,
}

impl AnswerResult {
    pub fn answered(text: impl Into<String>, sources: Vec<SourceReference>) -> Self {
        Self {
            text: text.into(),
            status: AnswerStatus::Answered,
            sources,
        }
    }

    pub fn fallback(
        text: impl Into<String>,
        reason: FallbackReason,
        sources: Vec<SourceReference>,
    ) -> Self {
        Self {
            text: text.into(),
            status: AnswerStatus::Fallback(reason),
            sources,
        }
    }
}
