//! Token-overlap grounding check
//!
//! Flags answers that lean on vocabulary the retrieved context never uses.
//! This is a cheap heuristic: paraphrases count as unsupported and invented
//! facts phrased with context words slip through.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::models::{GenerationConfig, ScoredResult};
use crate::domain::ports::{GroundingReport, GroundingValidator};

/// Rejects answers with too many long words absent from the context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenOverlapValidator {
    max_unsupported_terms: usize,
    min_token_length: usize,
}

impl TokenOverlapValidator {
    pub fn new(max_unsupported_terms: usize, min_token_length: usize) -> Self {
        Self {
            max_unsupported_terms,
            min_token_length,
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(config.max_unsupported_terms, config.min_token_length)
    }
}

impl Default for TokenOverlapValidator {
    fn default() -> Self {
        Self::from_config(&GenerationConfig::default())
    }
}

/// Lowercased alphanumeric word tokens of `text`
fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

impl GroundingValidator for TokenOverlapValidator {
    fn name(&self) -> &'static str {
        "token_overlap"
    }

    fn validate(&self, answer: &str, context: &[ScoredResult]) -> GroundingReport {
        let vocabulary: HashSet<String> = context
            .iter()
            .flat_map(|result| tokens(result.chunk.content()))
            .collect();

        let mut seen = HashSet::new();
        let unsupported: Vec<String> = tokens(answer)
            .filter(|token| token.chars().count() >= self.min_token_length)
            .filter(|token| !vocabulary.contains(token))
            .filter(|token| seen.insert(token.clone()))
            .collect();

        debug!(
            validator = self.name(),
            unsupported = unsupported.len(),
            allowed = self.max_unsupported_terms,
            "Grounding check"
        );

        if unsupported.len() > self.max_unsupported_terms {
            GroundingReport::ungrounded(unsupported)
        } else {
            GroundingReport::grounded(unsupported)
        }
    }
}
