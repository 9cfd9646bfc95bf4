//! Common test utilities for integration tests
//!
//! Provides the reference corpus, a scenario configuration and engine
//! builders shared across integration test files.

#![allow(dead_code)]

use std::sync::Arc;

use docrag::adapters::{InMemoryDocumentSource, MockChatBackend, MockEmbeddingBackend};
use docrag::domain::models::Config;
use docrag::RagEngine;

/// Reply used where the chat model is expected to answer from the manual
pub const SIDE_BUTTON_ANSWER: &str =
    "The device powers on via the side button.\n\n1. Hold the side button.";

/// The two-sentence product manual used by most scenarios
pub fn manual_corpus() -> InMemoryDocumentSource {
    InMemoryDocumentSource::from_texts([
        "The device powers on via the side button.",
        "Battery life is 10 hours.",
    ])
}

/// Manual plus a long warranty paragraph that single-word questions only
/// match weakly
pub fn manual_with_warranty() -> InMemoryDocumentSource {
    InMemoryDocumentSource::from_texts([
        "The device powers on via the side button.",
        "Battery life is 10 hours.",
        "Warranty coverage lasts twelve months from purchase and includes parts, labor, \
         shipping, returns, repairs and support.",
    ])
}

/// Configuration tuned for the short reference corpus
///
/// Threshold 0.2 (generation threshold 0.3), 1 ms retry delay.
pub fn scenario_config() -> Config {
    let mut config = Config::default();
    config.chunking.min_chunk_size = 5;
    config.retrieval.similarity_threshold = 0.2;
    config.retrieval.retry_delay_ms = 1;
    config
}

/// Build an engine over `source` with the mock embedder and `chat`
pub async fn engine_with(
    config: Config,
    source: &InMemoryDocumentSource,
    chat: Arc<MockChatBackend>,
) -> RagEngine {
    RagEngine::initialize(config, Arc::new(MockEmbeddingBackend::new()), chat, source)
        .await
        .expect("engine should initialize over the mock backends")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
