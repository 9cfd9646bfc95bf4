pub mod rag_engine;

pub use rag_engine::RagEngine;
