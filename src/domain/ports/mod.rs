//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces that adapters must implement:
//! - EmbeddingBackend: model listing and text embedding
//! - ChatBackend: chat completion
//! - DocumentSource: raw corpus text
//! - GroundingValidator: answer/context support checks
//!
//! These traits keep the retrieval engine independent of any particular
//! model server or document format.

pub mod chat;
pub mod document_source;
pub mod embedding;
pub mod grounding;

pub use chat::ChatBackend;
pub use document_source::DocumentSource;
pub use embedding::EmbeddingBackend;
pub use grounding::{GroundingReport, GroundingValidator};
