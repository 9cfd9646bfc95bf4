//! In-memory vector store
//!
//! Built once at startup from the chunked corpus and read-only afterwards.
//! Search is a linear scan over all entries.

use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};

use super::embedding_provider::EmbeddingProvider;
use super::retry::RetryPolicy;
use super::similarity;
use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{ScoredResult, TextChunk, VectorStoreEntry};

/// Chunks shorter than this are not worth a round-trip to the embedding model.
pub const MIN_CHARACTERS_FOR_EMBEDDING: usize = 10;

/// Immutable collection of embedded chunks sharing one dimensionality
#[derive(Debug, Clone, PartialEq)]
pub struct VectorStore {
    entries: Vec<VectorStoreEntry>,
    dimension: usize,
}

impl VectorStore {
    /// Embed every chunk and collect the successes.
    ///
    /// Each chunk is embedded under `retry`; a chunk that still fails is
    /// logged and skipped, as are chunks below [`MIN_CHARACTERS_FOR_EMBEDDING`]
    /// and vectors whose dimensionality differs from the first accepted one.
    /// At most `concurrency` embedding requests run at once; entries keep
    /// corpus order.
    ///
    /// # Errors
    /// `RagError::StoreInitialization` when no chunk could be embedded.
    #[instrument(skip_all, fields(model = provider.model(), chunk_count = chunks.len()))]
    pub async fn build(
        provider: &EmbeddingProvider,
        chunks: Vec<TextChunk>,
        concurrency: usize,
        retry: RetryPolicy,
    ) -> RagResult<Self> {
        let total = chunks.len();

        let (candidates, too_short): (Vec<_>, Vec<_>) = chunks
            .into_iter()
            .partition(|chunk| chunk.char_len() >= MIN_CHARACTERS_FOR_EMBEDDING);
        if !too_short.is_empty() {
            debug!(skipped = too_short.len(), "Skipping chunks too short to embed");
        }

        let embedded: Vec<_> = stream::iter(candidates)
            .map(|chunk| async move {
                let result = retry
                    .execute("embed_chunk", || provider.embed(chunk.content()))
                    .await;
                (chunk, result)
            })
            .buffered(concurrency.max(1))
            .collect()
            .await;

        let mut entries: Vec<VectorStoreEntry> = Vec::with_capacity(embedded.len());
        let mut dimension = 0usize;
        let mut failed = 0usize;

        for (chunk, result) in embedded {
            let vector = match result {
                Ok(vector) => vector,
                Err(err) => {
                    failed += 1;
                    warn!(
                        source = chunk.source(),
                        position = chunk.position(),
                        error = %err.summary(),
                        "Failed to embed chunk after retries, skipping"
                    );
                    continue;
                }
            };

            if vector.is_empty() {
                failed += 1;
                warn!(
                    source = chunk.source(),
                    position = chunk.position(),
                    "Embedding model returned an empty vector, skipping"
                );
                continue;
            }

            if entries.is_empty() {
                dimension = vector.len();
            } else if vector.len() != dimension {
                failed += 1;
                warn!(
                    source = chunk.source(),
                    position = chunk.position(),
                    expected = dimension,
                    actual = vector.len(),
                    "Embedding dimension mismatch, skipping"
                );
                continue;
            }

            entries.push(VectorStoreEntry::new(chunk, vector));
        }

        if entries.is_empty() {
            return Err(RagError::StoreInitialization(format!(
                "none of {total} chunks could be embedded ({failed} failed, {} too short)",
                too_short.len()
            )));
        }

        info!(
            entry_count = entries.len(),
            failed,
            too_short = too_short.len(),
            dimension,
            "Vector store built"
        );

        Ok(Self { entries, dimension })
    }

    /// Create a store from pre-computed entries.
    ///
    /// # Errors
    /// `RagError::StoreInitialization` when `entries` is empty, holds an empty
    /// vector, or mixes dimensionalities.
    pub fn from_entries(entries: Vec<VectorStoreEntry>) -> RagResult<Self> {
        let dimension = match entries.first() {
            Some(first) if first.dimension() > 0 => first.dimension(),
            Some(_) => {
                return Err(RagError::StoreInitialization(
                    "entries must not hold empty vectors".to_string(),
                ))
            }
            None => {
                return Err(RagError::StoreInitialization(
                    "no entries to store".to_string(),
                ))
            }
        };

        if let Some(bad) = entries.iter().find(|e| e.dimension() != dimension) {
            return Err(RagError::StoreInitialization(format!(
                "dimension mismatch: expected {dimension}, found {}",
                bad.dimension()
            )));
        }

        Ok(Self { entries, dimension })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dimensionality shared by every stored vector
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn entries(&self) -> &[VectorStoreEntry] {
        &self.entries
    }

    /// Cosine similarity of every entry against `query`, in corpus order
    pub fn score(&self, query: &[f32]) -> Vec<ScoredResult> {
        similarity::score_entries(&self.entries, query)
    }
}
