//! Embedding domain models
//!
//! Vectors, store entries and per-query scored results.

use serde::{Deserialize, Serialize};

use super::chunking::TextChunk;

/// Dense vector representation of a text, produced by an embedding model.
pub type EmbeddingVector = Vec<f32>;

/// A chunk paired with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorStoreEntry {
    /// The embedded chunk
    pub chunk: TextChunk,

    /// Embedding of the chunk content
    pub vector: EmbeddingVector,
}

impl VectorStoreEntry {
    pub fn new(chunk: TextChunk, vector: EmbeddingVector) -> Self {
        Self { chunk, vector }
    }

    /// Dimensionality of the stored vector
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}

/// A chunk scored against a query. Lives only for the duration of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    /// The matching chunk
    pub chunk: TextChunk,

    /// Cosine similarity to the query, in `[-1, 1]`
    pub similarity: f32,
}

impl ScoredResult {
    pub fn new(chunk: TextChunk, similarity: f32) -> Self {
        Self { chunk, similarity }
    }
}
