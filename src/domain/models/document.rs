//! Source document model

use serde::{Deserialize, Serialize};

/// Raw text extracted from one source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Document name (file name or caller-chosen identifier)
    pub name: String,

    /// Extracted text, paragraphs separated by line breaks
    pub text: String,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}
