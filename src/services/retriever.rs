//! Similarity retriever
//!
//! Embeds the query (with retry), scores every stored chunk and keeps the
//! best matches above the similarity threshold.

use tracing::{debug, instrument};

use super::embedding_provider::EmbeddingProvider;
use super::retry::RetryPolicy;
use super::similarity;
use super::vector_store::VectorStore;
use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{RetrievalConfig, ScoredResult};

#[derive(Debug, Clone)]
pub struct Retriever {
    provider: EmbeddingProvider,
    config: RetrievalConfig,
    retry: RetryPolicy,
}

impl Retriever {
    pub fn new(provider: EmbeddingProvider, config: RetrievalConfig) -> Self {
        let retry = RetryPolicy::from_config(&config);
        Self {
            provider,
            config,
            retry,
        }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Retrieve the chunks most similar to `query`, best first.
    ///
    /// Returns at most `top_n` results, all scoring strictly above the
    /// similarity threshold. An empty result is not an error.
    ///
    /// # Errors
    /// `RagError::Retrieval` when the query cannot be embedded after retries
    /// or its dimensionality does not match the store.
    #[instrument(skip(self, store), fields(store_len = store.len()))]
    pub async fn retrieve(&self, store: &VectorStore, query: &str) -> RagResult<Vec<ScoredResult>> {
        let query_vector = self
            .retry
            .execute("embed_query", || self.provider.embed(query))
            .await
            .map_err(|e| RagError::Retrieval(format!("query embedding failed: {}", e.summary())))?;

        if query_vector.len() != store.dimension() {
            return Err(RagError::Retrieval(format!(
                "query dimension {} does not match store dimension {}",
                query_vector.len(),
                store.dimension()
            )));
        }

        let results = similarity::rank(
            store.score(&query_vector),
            self.config.similarity_threshold,
            self.config.top_n,
        );

        debug!(
            result_count = results.len(),
            best_similarity = results.first().map(|r| r.similarity),
            "Retrieved context"
        );

        Ok(results)
    }
}
