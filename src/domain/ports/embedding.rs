//! Embedding backend port.
//!
//! A model-serving endpoint that advertises its installed models and turns
//! text into dense vectors.

use async_trait::async_trait;

use crate::domain::errors::RagResult;
use crate::domain::models::EmbeddingVector;

/// Trait for embedding backends
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Backend name (e.g., "ollama", "mock").
    fn name(&self) -> &'static str;

    /// Names of the models the backend currently serves.
    ///
    /// Fails with `RagError::Provider` when the backend cannot be reached.
    async fn list_models(&self) -> RagResult<Vec<String>>;

    /// Embed a single text with `model`.
    ///
    /// Fails with `RagError::Embedding` on backend failure or a malformed response.
    async fn embed(&self, model: &str, text: &str) -> RagResult<EmbeddingVector>;
}
