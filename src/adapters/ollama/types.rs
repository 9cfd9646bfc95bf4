//! Ollama REST API payloads

use serde::{Deserialize, Serialize};

use crate::domain::models::{ChatMessage, ChatOptions};

/// Response of `GET /api/tags`
#[derive(Debug, Clone, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

/// One installed model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,

    /// Size on disk in bytes
    #[serde(default)]
    pub size: Option<u64>,

    #[serde(default)]
    pub modified_at: Option<String>,
}

/// Request body of `POST /api/embeddings`
#[derive(Debug, Serialize)]
pub struct EmbeddingsRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
}

/// Response of `POST /api/embeddings`
#[derive(Debug, Deserialize)]
pub struct EmbeddingsResponse {
    #[serde(default)]
    pub embedding: Vec<f32>,
}

/// Request body of `POST /api/chat`
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub stream: bool,
    pub options: RequestOptions,
}

/// Model options understood by Ollama
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RequestOptions {
    pub temperature: f32,
    pub num_ctx: u32,
}

impl From<ChatOptions> for RequestOptions {
    fn from(options: ChatOptions) -> Self {
        Self {
            temperature: options.temperature,
            num_ctx: options.context_window,
        }
    }
}

/// Response of a non-streaming `POST /api/chat`
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: String,
    pub content: String,
}
