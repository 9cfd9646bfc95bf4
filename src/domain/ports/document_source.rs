//! Document source port.
//!
//! Supplies raw extracted text. The engine never sees file formats.

use async_trait::async_trait;

use crate::domain::errors::RagResult;
use crate::domain::models::SourceDocument;

#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Human-readable description of where documents come from.
    fn describe(&self) -> String;

    /// Load every document of the corpus.
    ///
    /// Fails with `RagError::Document` when no document could be loaded.
    async fn load(&self) -> RagResult<Vec<SourceDocument>>;
}
