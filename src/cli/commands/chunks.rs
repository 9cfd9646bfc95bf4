//! Implementation of the `docrag chunks` command.

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::adapters::DirectoryDocumentSource;
use crate::cli::output::table::TableFormatter;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, TextChunk};
use crate::domain::ports::DocumentSource;
use crate::services::Chunker;

#[derive(Args, Debug)]
pub struct ChunksArgs {
    /// Save all chunks to a .json, .yaml or .yml file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show at most this many chunks
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ChunksOutput {
    pub document_count: usize,
    pub chunk_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<PathBuf>,
    pub chunks: Vec<TextChunk>,
}

impl CommandOutput for ChunksOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![TableFormatter::new().format_chunks(&self.chunks)];

        let shown = if self.chunks.len() < self.chunk_count {
            format!(" (showing {})", self.chunks.len())
        } else {
            String::new()
        };
        lines.push(format!(
            "{} chunks from {} documents{shown}",
            self.chunk_count, self.document_count
        ));

        if let Some(path) = &self.saved_to {
            lines.push(format!(
                "{} Saved chunks to {}",
                console::style("✓").green(),
                path.display()
            ));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Serialization format chosen from a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkFileFormat {
    Json,
    Yaml,
}

impl ChunkFileFormat {
    fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => bail!(
                "Unsupported chunk file extension for {}. Use .json, .yaml or .yml",
                path.display()
            ),
        }
    }
}

/// Write `chunks` to `path` as JSON or YAML, chosen by extension
pub async fn write_chunks(path: &Path, chunks: &[TextChunk]) -> Result<()> {
    let contents = match ChunkFileFormat::from_path(path)? {
        ChunkFileFormat::Json => {
            serde_json::to_string_pretty(chunks).context("Failed to serialize chunks as JSON")?
        }
        ChunkFileFormat::Yaml => {
            serde_yaml::to_string(chunks).context("Failed to serialize chunks as YAML")?
        }
    };

    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write chunks to {}", path.display()))
}

pub async fn execute(args: ChunksArgs, config: Config, json_mode: bool) -> Result<()> {
    let chunker = Chunker::with_config(config.chunking.clone())?;
    let source = DirectoryDocumentSource::from_config(&config.corpus);

    let documents = source.load().await.context("Failed to load corpus")?;
    let mut chunks = chunker.chunk_documents(&documents);
    let chunk_count = chunks.len();

    if let Some(path) = &args.output {
        write_chunks(path, &chunks).await?;
    }

    if let Some(limit) = args.limit {
        chunks.truncate(limit);
    }

    output(
        &ChunksOutput {
            document_count: documents.len(),
            chunk_count,
            saved_to: args.output,
            chunks,
        },
        json_mode,
    );
    Ok(())
}
