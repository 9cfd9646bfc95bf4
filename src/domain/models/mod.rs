pub mod answer;
pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod generation;
pub mod retrieval;

pub use answer::{AnswerResult, AnswerStatus, FallbackReason, SourceReference};
pub use chunking::{ChunkingConfig, OverlapSource, TextChunk};
pub use config::{BackendConfig, Config, CorpusConfig, LoggingConfig, ModelsConfig};
pub use document::SourceDocument;
pub use embedding::{EmbeddingVector, ScoredResult, VectorStoreEntry};
pub use generation::{
    ChatMessage, ChatOptions, ChatRole, GenerationConfig, DEFAULT_FALLBACK_RESPONSE,
};
pub use retrieval::{RetrievalConfig, GENERATION_THRESHOLD_FACTOR};
