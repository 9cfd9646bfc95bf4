//! Adapters for external systems.

pub mod documents;
pub mod mock;
pub mod ollama;

pub use documents::{DirectoryDocumentSource, InMemoryDocumentSource};
pub use mock::{MockChatBackend, MockChatResponse, MockEmbeddingBackend};
pub use ollama::{OllamaClient, OllamaClientConfig};
