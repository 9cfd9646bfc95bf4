use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::chunking::ChunkingConfig;
use super::generation::GenerationConfig;
use super::retrieval::RetrievalConfig;

/// Main configuration structure for docrag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Model-serving backend connection
    #[serde(default)]
    pub backend: BackendConfig,

    /// Embedding and language model names
    #[serde(default)]
    pub models: ModelsConfig,

    /// Where the document corpus is read from
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Chunking parameters
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Retrieval and retry parameters
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Answer generation policy
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Model-serving backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BackendConfig {
    /// Base URL of the Ollama server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

const fn default_timeout_secs() -> u64 {
    120
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Model names as registered with the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ModelsConfig {
    /// Model used for chunk and query embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding: String,

    /// Model used for answer generation
    #[serde(default = "default_language_model")]
    pub language: String,
}

fn default_embedding_model() -> String {
    "nomic-embed-text:latest".to_string()
}

fn default_language_model() -> String {
    "llama3:latest".to_string()
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            embedding: default_embedding_model(),
            language: default_language_model(),
        }
    }
}

/// Document corpus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CorpusConfig {
    /// Directory containing the source documents
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// File extensions (without dot) loaded from `data_dir`
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_extensions() -> Vec<String> {
    vec!["txt".to_string(), "md".to_string()]
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            extensions: default_extensions(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// File rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
