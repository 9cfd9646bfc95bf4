//! Document source adapters.
//!
//! Text extraction from binary formats is out of scope; these sources hand
//! the engine plain UTF-8 text.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{CorpusConfig, SourceDocument};
use crate::domain::ports::DocumentSource;

/// Reads UTF-8 text files from a directory (non-recursive).
#[derive(Debug, Clone)]
pub struct DirectoryDocumentSource {
    dir: PathBuf,
    extensions: Vec<String>,
}

impl DirectoryDocumentSource {
    pub fn new(dir: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            dir: dir.into(),
            extensions: extensions
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &CorpusConfig) -> Self {
        Self::new(&config.data_dir, config.extensions.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    async fn matching_files(&self) -> RagResult<Vec<PathBuf>> {
        let read_error =
            |e: std::io::Error| RagError::Document(format!("cannot read {}: {e}", self.dir.display()));

        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(read_error)?;
        let mut paths = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
            let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            let path = entry.path();
            if is_file && self.accepts(&path) {
                paths.push(path);
            }
        }

        paths.sort();
        Ok(paths)
    }
}

#[async_trait]
impl DocumentSource for DirectoryDocumentSource {
    fn describe(&self) -> String {
        format!("{} (*.{})", self.dir.display(), self.extensions.join(", *."))
    }

    async fn load(&self) -> RagResult<Vec<SourceDocument>> {
        let paths = self.matching_files().await?;
        if paths.is_empty() {
            return Err(RagError::Document(format!(
                "no documents found in {}",
                self.describe()
            )));
        }

        let mut documents = Vec::with_capacity(paths.len());
        for path in &paths {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            match tokio::fs::read_to_string(path).await {
                Ok(text) => {
                    debug!(document = %name, chars = text.chars().count(), "Loaded document");
                    documents.push(SourceDocument::new(name, text));
                }
                Err(e) => warn!(document = %name, error = %e, "Skipping unreadable document"),
            }
        }

        if documents.is_empty() {
            return Err(RagError::Document(format!(
                "none of the {} documents in {} could be read",
                paths.len(),
                self.dir.display()
            )));
        }

        info!(document_count = documents.len(), source = %self.describe(), "Corpus loaded");
        Ok(documents)
    }
}

/// Serves documents held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentSource {
    documents: Vec<SourceDocument>,
}

impl InMemoryDocumentSource {
    pub fn new(documents: Vec<SourceDocument>) -> Self {
        Self { documents }
    }

    /// One document per text, named `doc-0`, `doc-1`, ...
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            texts
                .into_iter()
                .enumerate()
                .map(|(i, text)| SourceDocument::new(format!("doc-{i}"), text))
                .collect(),
        )
    }
}

#[async_trait]
impl DocumentSource for InMemoryDocumentSource {
    fn describe(&self) -> String {
        format!("{} in-memory documents", self.documents.len())
    }

    async fn load(&self) -> RagResult<Vec<SourceDocument>> {
        if self.documents.is_empty() {
            return Err(RagError::Document("no documents supplied".to_string()));
        }
        Ok(self.documents.clone())
    }
}
