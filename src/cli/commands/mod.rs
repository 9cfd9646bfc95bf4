//! Command implementations and the setup they share.

pub mod ask;
pub mod chunks;
pub mod models;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::adapters::{DirectoryDocumentSource, OllamaClient, OllamaClientConfig};
use crate::application::RagEngine;
use crate::cli::output::progress::{create_spinner, ProgressBarExt};
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

/// Load configuration from `path`, or from `.docrag/` and the environment
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Ollama client for the configured backend
pub fn ollama_client(config: &Config) -> Result<Arc<OllamaClient>> {
    let client = OllamaClient::new(OllamaClientConfig::from(&config.backend))
        .context("Failed to create Ollama client")?;
    Ok(Arc::new(client))
}

/// Build the engine over the configured corpus, showing a spinner meanwhile
pub async fn build_engine(config: Config, json_mode: bool) -> Result<RagEngine> {
    let client = ollama_client(&config)?;
    let source = DirectoryDocumentSource::from_config(&config.corpus);

    let spinner = create_spinner(
        format!("Indexing {} with {}", source.dir().display(), config.models.embedding),
        json_mode,
    );

    match RagEngine::initialize(config, client.clone(), client, &source).await {
        Ok(engine) => {
            spinner.finish_success(format!("Indexed {} chunks", engine.store().len()));
            Ok(engine)
        }
        Err(err) => {
            spinner.finish_error("Indexing failed");
            Err(err).context("Failed to initialize the RAG engine")
        }
    }
}
