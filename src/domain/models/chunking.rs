//! Text chunking domain models
//!
//! Models for splitting extracted document text into bounded, overlapping
//! units suitable for embedding. All sizes are measured in characters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the overlap that seeds a new chunk is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapSource {
    /// Seed with the tail of the paragraph that forced the flush.
    /// The paragraph itself is not carried into the next chunk.
    #[default]
    TriggeringParagraph,

    /// Seed with the tail of the chunk that was just flushed, then append
    /// the triggering paragraph.
    FlushedChunk,
}

impl fmt::Display for OverlapSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TriggeringParagraph => write!(f, "triggering_paragraph"),
            Self::FlushedChunk => write!(f, "flushed_chunk"),
        }
    }
}

/// Configuration for document chunking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChunkingConfig {
    /// Maximum size of each chunk in characters
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,

    /// Chunks shorter than this are dropped as too low-signal to embed
    #[serde(default = "default_min_chunk_size")]
    pub min_chunk_size: usize,

    /// Number of characters carried into the next chunk
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Source of the carried overlap
    #[serde(default)]
    pub overlap_source: OverlapSource,
}

const fn default_max_chunk_size() -> usize {
    1000
}

const fn default_min_chunk_size() -> usize {
    50
}

const fn default_chunk_overlap() -> usize {
    100
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: default_max_chunk_size(),
            min_chunk_size: default_min_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            overlap_source: OverlapSource::default(),
        }
    }
}

impl ChunkingConfig {
    /// Create a configuration with explicit sizes and the default overlap source
    pub fn new(max_chunk_size: usize, min_chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            max_chunk_size,
            min_chunk_size,
            chunk_overlap,
            overlap_source: OverlapSource::default(),
        }
    }

    /// Use a different overlap source
    pub fn with_overlap_source(mut self, overlap_source: OverlapSource) -> Self {
        self.overlap_source = overlap_source;
        self
    }

    /// Validate the chunking configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chunk_size == 0 {
            return Err("max_chunk_size must be greater than 0".to_string());
        }

        if self.chunk_overlap >= self.max_chunk_size {
            return Err("chunk_overlap must be less than max_chunk_size".to_string());
        }

        if self.min_chunk_size > self.max_chunk_size {
            return Err("min_chunk_size cannot exceed max_chunk_size".to_string());
        }

        Ok(())
    }
}

/// An immutable unit of source text used for retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextChunk {
    source: String,
    position: usize,
    content: String,
}

impl TextChunk {
    /// Create a chunk produced from `source` at `position` (0-based)
    pub fn new(source: impl Into<String>, position: usize, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            position,
            content: content.into(),
        }
    }

    /// Name of the document this chunk was produced from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Index of this chunk within its source document
    pub fn position(&self) -> usize {
        self.position
    }

    /// The chunk text
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// First 100 characters of the content
    pub fn preview(&self) -> String {
        crate::domain::errors::truncate_chars(&self.content, 100)
    }
}

impl AsRef<str> for TextChunk {
    fn as_ref(&self) -> &str {
        &self.content
    }
}

impl fmt::Display for TextChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}
