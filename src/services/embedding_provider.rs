//! Embedding provider
//!
//! Binds an embedding backend to the configured model and checks that the
//! backend actually serves the models the engine was configured with.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::EmbeddingVector;
use crate::domain::ports::EmbeddingBackend;

/// Tag assumed by model servers when a model name carries none
const DEFAULT_MODEL_TAG: &str = "latest";

/// Embedding service bound to one model
#[derive(Clone)]
pub struct EmbeddingProvider {
    backend: Arc<dyn EmbeddingBackend>,
    model: String,
}

impl EmbeddingProvider {
    pub fn new(backend: Arc<dyn EmbeddingBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn backend(&self) -> &Arc<dyn EmbeddingBackend> {
        &self.backend
    }

    /// Check that the bound model is available on the backend
    pub async fn verify(&self) -> RagResult<()> {
        self.verify_model(&self.model).await
    }

    /// Check that `model` is available on the backend.
    ///
    /// # Errors
    /// * `RagError::Provider` - the backend could not be reached
    /// * `RagError::ModelUnavailable` - the model is not installed
    #[instrument(skip(self), fields(backend = self.backend.name()))]
    pub async fn verify_model(&self, model: &str) -> RagResult<()> {
        let available = self.backend.list_models().await?;

        if available.iter().any(|name| model_matches(model, name)) {
            debug!(model, "Model available");
            return Ok(());
        }

        Err(RagError::ModelUnavailable {
            model: model.to_string(),
            available,
        })
    }

    /// Embed `text` with the bound model
    pub async fn embed(&self, text: &str) -> RagResult<EmbeddingVector> {
        self.backend.embed(&self.model, text).await
    }
}

impl std::fmt::Debug for EmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingProvider")
            .field("backend", &self.backend.name())
            .field("model", &self.model)
            .finish()
    }
}

/// Whether a configured model name refers to an advertised model.
///
/// An untagged name matches the `:latest` tag of the same model.
pub fn model_matches(requested: &str, advertised: &str) -> bool {
    if requested == advertised {
        return true;
    }

    !requested.contains(':')
        && advertised
            .strip_prefix(requested)
            .and_then(|rest| rest.strip_prefix(':'))
            .is_some_and(|tag| tag == DEFAULT_MODEL_TAG)
}
