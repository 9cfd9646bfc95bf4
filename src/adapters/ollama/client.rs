//! Ollama HTTP client
//!
//! Implements both backend ports against a single Ollama server:
//! - `GET /api/tags` for the installed model list
//! - `POST /api/embeddings` for embeddings
//! - `POST /api/chat` (non-streaming) for chat completion
//!
//! The client does not retry; retry policy belongs to the services.

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

use super::error::OllamaError;
use super::types::{
    ChatRequest, ChatResponse, EmbeddingsRequest, EmbeddingsResponse, ModelInfo, TagsResponse,
};
use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{BackendConfig, ChatMessage, ChatOptions, EmbeddingVector};
use crate::domain::ports::{ChatBackend, EmbeddingBackend};

/// Configuration for the Ollama HTTP client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaClientConfig {
    /// Server base URL, without the `/api` suffix
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OllamaClientConfig {
    fn default() -> Self {
        Self::from(&BackendConfig::default())
    }
}

impl From<&BackendConfig> for OllamaClientConfig {
    fn from(config: &BackendConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// HTTP client for a local or remote Ollama server
#[derive(Debug, Clone)]
pub struct OllamaClient {
    /// Reusable HTTP client with connection pooling
    http_client: ReqwestClient,

    /// Base URL with any trailing slash removed
    base_url: String,
}

impl OllamaClient {
    /// Create a new client
    ///
    /// # Returns
    /// * `Ok(OllamaClient)` - Successfully created client
    /// * `Err(RagError::Config)` - Failed to build HTTP client
    pub fn new(config: OllamaClientConfig) -> RagResult<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| RagError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Installed models with their metadata
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn installed_models(&self) -> Result<Vec<ModelInfo>, OllamaError> {
        let tags: TagsResponse = send_json(self.http_client.get(self.url("/api/tags"))).await?;
        debug!(model_count = tags.models.len(), "Listed models");
        Ok(tags.models)
    }

    async fn request_embedding(&self, model: &str, text: &str) -> Result<EmbeddingVector, OllamaError> {
        let request = EmbeddingsRequest { model, prompt: text };
        let response: EmbeddingsResponse =
            send_json(self.http_client.post(self.url("/api/embeddings")).json(&request)).await?;

        if response.embedding.is_empty() {
            return Err(OllamaError::InvalidResponse(
                "embedding response holds no vector".to_string(),
            ));
        }
        Ok(response.embedding)
    }

    async fn request_chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: ChatOptions,
    ) -> Result<String, OllamaError> {
        let request = ChatRequest {
            model,
            messages,
            stream: false,
            options: options.into(),
        };
        let response: ChatResponse =
            send_json(self.http_client.post(self.url("/api/chat")).json(&request)).await?;

        debug!(role = %response.message.role, chars = response.message.content.len(), "Chat completion received");
        Ok(response.message.content)
    }
}

/// Send a request, map non-success statuses and parse the JSON body
async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, OllamaError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read response body".to_string());
        return Err(OllamaError::from_status(status, body));
    }

    response
        .json()
        .await
        .map_err(|e| OllamaError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl EmbeddingBackend for OllamaClient {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn list_models(&self) -> RagResult<Vec<String>> {
        let models = self
            .installed_models()
            .await
            .map_err(|e| e.classify(RagError::Provider))?;
        Ok(models.into_iter().map(|m| m.name).collect())
    }

    async fn embed(&self, model: &str, text: &str) -> RagResult<EmbeddingVector> {
        self.request_embedding(model, text)
            .await
            .map_err(|e| e.into_rag_error(model, RagError::Embedding))
    }
}

#[async_trait]
impl ChatBackend for OllamaClient {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: ChatOptions,
    ) -> RagResult<String> {
        self.request_chat(model, messages, options)
            .await
            .map_err(|e| e.into_rag_error(model, RagError::Chat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = OllamaClient::new(OllamaClientConfig {
            base_url: "http://localhost:11434/".into(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434");
        assert_eq!(client.url("/api/tags"), "http://localhost:11434/api/tags");
    }

    #[test]
    fn test_config_from_backend_config() {
        let config = OllamaClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.timeout_secs, 120);
    }
}
