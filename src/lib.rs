//! docrag - Retrieval-augmented question answering over local documents
//!
//! docrag splits a document corpus into overlapping chunks, embeds them with
//! a local model server, and answers questions from the chunks most similar
//! to the question. Answers are checked against the retrieved context; when
//! nothing relevant is found, or the model strays from the context, a fixed
//! fallback response is returned instead.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, port traits and the error taxonomy
//! - **Service Layer** (`services`): Chunking, embedding, retrieval and answer synthesis
//! - **Adapter Layer** (`adapters`): Ollama HTTP client, document sources, mocks
//! - **Application Layer** (`application`): The `RagEngine` that wires it together
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use docrag::adapters::{InMemoryDocumentSource, OllamaClient, OllamaClientConfig};
//! use docrag::{Config, RagEngine};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let client = Arc::new(OllamaClient::new(OllamaClientConfig::from(&config.backend))?);
//!     let source = InMemoryDocumentSource::from_texts([
//!         "The device powers on via the side button.",
//!         "Battery life is 10 hours.",
//!     ]);
//!
//!     let engine = RagEngine::initialize(config, client.clone(), client, &source).await?;
//!     let answer = engine.ask_question("How do I turn on the device?").await?;
//!     println!("{}", answer.text);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use application::RagEngine;
pub use domain::models::{
    AnswerResult, AnswerStatus, ChunkingConfig, Config, FallbackReason, GenerationConfig,
    RetrievalConfig, ScoredResult, SourceDocument, TextChunk,
};
pub use domain::ports::{ChatBackend, DocumentSource, EmbeddingBackend, GroundingValidator};
pub use domain::{RagError, RagResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{AnswerSynthesizer, Chunker, EmbeddingProvider, Retriever, VectorStore};
