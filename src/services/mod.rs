pub mod answer_formatter;
pub mod answer_synthesizer;
pub mod chunker;
pub mod embedding_provider;
pub mod grounding;
pub mod retriever;
pub mod retry;
pub mod similarity;
pub mod vector_store;

pub use answer_formatter::AnswerFormatter;
pub use answer_synthesizer::AnswerSynthesizer;
pub use chunker::Chunker;
pub use embedding_provider::EmbeddingProvider;
pub use grounding::TokenOverlapValidator;
pub use retriever::Retriever;
pub use retry::{LinearBackoff, RetryPolicy};
pub use vector_store::{VectorStore, MIN_CHARACTERS_FOR_EMBEDDING};
