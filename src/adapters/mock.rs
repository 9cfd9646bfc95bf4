//! Mock backends for testing.
//!
//! The embedding mock hashes content words into a fixed number of buckets,
//! so texts sharing vocabulary get similar vectors and results are fully
//! deterministic.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{ChatMessage, ChatOptions, EmbeddingVector};
use crate::domain::ports::{ChatBackend, EmbeddingBackend};

/// Dimensionality of mock embeddings
pub const MOCK_EMBEDDING_DIMENSION: usize = 256;

const STOPWORDS: &[&str] = &[
    "about", "and", "are", "can", "did", "does", "for", "from", "has", "have", "how", "into",
    "its", "not", "that", "the", "this", "via", "was", "what", "when", "where", "which", "who",
    "why", "will", "with", "you", "your",
];

/// 64-bit FNV-1a, stable across platforms and releases
fn fnv1a(text: &str) -> u64 {
    text.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

/// Bag-of-words embedding of `text` over `dimension` hashed buckets.
///
/// Words shorter than 3 chars and common stopwords are ignored. A text with
/// no content words embeds to the zero vector.
pub fn bag_of_words_embedding(text: &str, dimension: usize) -> EmbeddingVector {
    let mut vector = vec![0.0f32; dimension.max(1)];
    let len = vector.len() as u64;

    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|w| w.chars().count() >= 3 && !STOPWORDS.contains(&w.as_str()))
    {
        // Bucket index is always < len, which came from a usize.
        let bucket = (fnv1a(&word) % len) as usize;
        vector[bucket] += 1.0;
    }

    vector
}

/// Deterministic embedding backend
#[derive(Debug)]
pub struct MockEmbeddingBackend {
    models: Vec<String>,
    dimension: usize,
    reachable: bool,
    fail_all: bool,
    fail_containing: Option<String>,
    calls: AtomicUsize,
}

impl MockEmbeddingBackend {
    /// Backend advertising `nomic-embed-text:latest` and `llama3:latest`
    pub fn new() -> Self {
        Self {
            models: vec!["nomic-embed-text:latest".to_string(), "llama3:latest".to_string()],
            dimension: MOCK_EMBEDDING_DIMENSION,
            reachable: true,
            fail_all: false,
            fail_containing: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Fail every call, including model listing
    pub fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }

    /// Fail every embedding request
    pub fn failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Fail embedding requests for texts containing `needle`
    pub fn failing_on(mut self, needle: impl Into<String>) -> Self {
        self.fail_containing = Some(needle.into());
        self
    }

    /// Number of embedding requests received
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockEmbeddingBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingBackend for MockEmbeddingBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn list_models(&self) -> RagResult<Vec<String>> {
        if !self.reachable {
            return Err(RagError::Provider("mock backend unreachable".to_string()));
        }
        Ok(self.models.clone())
    }

    async fn embed(&self, _model: &str, text: &str) -> RagResult<EmbeddingVector> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let forced_failure = self
            .fail_containing
            .as_deref()
            .is_some_and(|needle| text.contains(needle));
        if !self.reachable || self.fail_all || forced_failure {
            return Err(RagError::Embedding("mock embedding failure".to_string()));
        }

        Ok(bag_of_words_embedding(text, self.dimension))
    }
}

/// Mock response configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum MockChatResponse {
    Reply(String),
    Failure(String),
}

impl MockChatResponse {
    pub fn success(output: impl Into<String>) -> Self {
        Self::Reply(output.into())
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure(error.into())
    }

    fn into_result(self) -> RagResult<String> {
        match self {
            Self::Reply(text) => Ok(text),
            Self::Failure(message) => Err(RagError::Chat(message)),
        }
    }
}

/// Scripted chat backend.
///
/// Queued responses are served first, in order; afterwards every call gets
/// the default response.
#[derive(Debug)]
pub struct MockChatBackend {
    default_response: MockChatResponse,
    queued: RwLock<VecDeque<MockChatResponse>>,
    last_messages: RwLock<Option<Vec<ChatMessage>>>,
    last_options: RwLock<Option<ChatOptions>>,
    calls: AtomicUsize,
}

impl MockChatBackend {
    pub fn with_default_response(response: MockChatResponse) -> Self {
        Self {
            default_response: response,
            queued: RwLock::new(VecDeque::new()),
            last_messages: RwLock::new(None),
            last_options: RwLock::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always answer `text`
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_default_response(MockChatResponse::success(text))
    }

    /// Fail every call
    pub fn failing() -> Self {
        Self::with_default_response(MockChatResponse::failure("mock chat backend unavailable"))
    }

    /// Serve `responses` before falling back to the default response
    pub fn with_queue(self, responses: Vec<MockChatResponse>) -> Self {
        Self {
            queued: RwLock::new(responses.into()),
            ..self
        }
    }

    /// Number of chat requests received
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Messages of the most recent request
    pub async fn last_messages(&self) -> Option<Vec<ChatMessage>> {
        self.last_messages.read().await.clone()
    }

    /// Options of the most recent request
    pub async fn last_options(&self) -> Option<ChatOptions> {
        *self.last_options.read().await
    }
}

#[async_trait]
impl ChatBackend for MockChatBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn chat(
        &self,
        _model: &str,
        messages: &[ChatMessage],
        options: ChatOptions,
    ) -> RagResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_messages.write().await = Some(messages.to_vec());
        *self.last_options.write().await = Some(options);

        let next = self.queued.write().await.pop_front();
        next.unwrap_or_else(|| self.default_response.clone())
            .into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::similarity::cosine_similarity;

    #[test]
    fn test_embedding_is_deterministic() {
        let a = bag_of_words_embedding("The device powers on", MOCK_EMBEDDING_DIMENSION);
        let b = bag_of_words_embedding("the DEVICE powers on!", MOCK_EMBEDDING_DIMENSION);
        assert_eq!(a, b);
        assert_eq!(a.len(), MOCK_EMBEDDING_DIMENSION);
    }

    #[test]
    fn test_shared_vocabulary_is_similar() {
        let doc = bag_of_words_embedding("The device powers on via the side button.", 256);
        let related = bag_of_words_embedding("How do I turn on the device?", 256);
        let unrelated = bag_of_words_embedding("What is the capital of France?", 256);

        assert!(cosine_similarity(&doc, &related) > 0.3);
        assert_eq!(cosine_similarity(&doc, &unrelated), 0.0);
    }

    #[test]
    fn test_stopwords_only_embeds_to_zero() {
        let v = bag_of_words_embedding("how is the", 16);
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[tokio::test]
    async fn test_failure_modes() {
        let backend = MockEmbeddingBackend::new().failing_on("broken");
        assert!(backend.embed("m", "a broken chunk").await.is_err());
        assert!(backend.embed("m", "a healthy chunk").await.is_ok());
        assert_eq!(backend.calls(), 2);

        let backend = MockEmbeddingBackend::new().unreachable();
        assert_eq!(backend.list_models().await.unwrap_err().kind(), "provider");
    }

    #[tokio::test]
    async fn test_chat_queue_then_default() {
        let chat = MockChatBackend::replying("default")
            .with_queue(vec![MockChatResponse::failure("busy"), MockChatResponse::success("first")]);
        let options = ChatOptions {
            temperature: 0.1,
            context_window: 4096,
        };
        let messages = [ChatMessage::user("q")];

        assert!(chat.chat("m", &messages, options).await.is_err());
        assert_eq!(chat.chat("m", &messages, options).await.unwrap(), "first");
        assert_eq!(chat.chat("m", &messages, options).await.unwrap(), "default");
        assert_eq!(chat.calls(), 3);
        assert_eq!(chat.last_messages().await, Some(messages.to_vec()));
        assert_eq!(chat.last_options().await, Some(options));
    }
}
