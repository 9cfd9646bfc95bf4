//! Domain layer for docrag
//!
//! This module contains the core models, the port traits implemented by
//! adapters, and the engine's error taxonomy. Nothing here performs I/O.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{RagError, RagResult};
