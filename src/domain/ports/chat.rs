//! Chat completion backend port.

use async_trait::async_trait;

use crate::domain::errors::RagResult;
use crate::domain::models::{ChatMessage, ChatOptions};

/// Trait for chat completion backends
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Backend name (e.g., "ollama", "mock").
    fn name(&self) -> &'static str;

    /// Run a single, non-streaming chat completion and return the assistant text.
    ///
    /// Fails with `RagError::Chat` on backend failure or a malformed response.
    async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: ChatOptions,
    ) -> RagResult<String>;
}
