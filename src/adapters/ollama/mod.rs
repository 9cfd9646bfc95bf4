//! Ollama model server adapter

pub mod client;
pub mod error;
pub mod types;

pub use client::{OllamaClient, OllamaClientConfig};
pub use error::OllamaError;
pub use types::ModelInfo;
