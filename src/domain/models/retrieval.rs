//! Retrieval configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Factor applied to the retrieval threshold before an answer is generated.
///
/// Ranking is permissive, generation is conservative: the best match must
/// clear `similarity_threshold * GENERATION_THRESHOLD_FACTOR`.
pub const GENERATION_THRESHOLD_FACTOR: f32 = 1.5;

/// Parameters for similarity retrieval and backend retries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetrievalConfig {
    /// Maximum number of results returned per query
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Results scoring at or below this cosine similarity are discarded
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Retries after the first failed backend call
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay for linear backoff; the n-th retry waits `n * retry_delay_ms`
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Concurrent embedding requests while building the vector store
    #[serde(default = "default_build_concurrency")]
    pub build_concurrency: usize,
}

const fn default_top_n() -> usize {
    3
}

const fn default_similarity_threshold() -> f32 {
    0.3
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_retry_delay_ms() -> u64 {
    500
}

const fn default_build_concurrency() -> usize {
    4
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            similarity_threshold: default_similarity_threshold(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            build_concurrency: default_build_concurrency(),
        }
    }
}

impl RetrievalConfig {
    /// Base retry delay as a `Duration`
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Minimum best-match similarity required before generating an answer.
    ///
    /// Never below `similarity_threshold` for the `[0, 1]` range the config
    /// loader accepts.
    pub fn generation_threshold(&self) -> f32 {
        self.similarity_threshold * GENERATION_THRESHOLD_FACTOR
    }
}
