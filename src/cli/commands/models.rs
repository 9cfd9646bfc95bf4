//! Implementation of the `docrag models` command.

use anyhow::{Context, Result};
use serde::Serialize;

use super::ollama_client;
use crate::adapters::ollama::ModelInfo;
use crate::cli::output::table::TableFormatter;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::services::embedding_provider::model_matches;

#[derive(Debug, Serialize)]
pub struct ConfiguredModel {
    pub role: &'static str,
    pub name: String,
    pub available: bool,
}

#[derive(Debug, Serialize)]
pub struct ModelsOutput {
    pub base_url: String,
    pub installed: Vec<ModelInfo>,
    pub configured: Vec<ConfiguredModel>,
}

impl ModelsOutput {
    pub fn new(base_url: impl Into<String>, installed: Vec<ModelInfo>, config: &Config) -> Self {
        let configured = [
            ("embedding", &config.models.embedding),
            ("language", &config.models.language),
        ]
        .into_iter()
        .map(|(role, name)| ConfiguredModel {
            role,
            name: name.clone(),
            available: installed.iter().any(|m| model_matches(name, &m.name)),
        })
        .collect();

        Self {
            base_url: base_url.into(),
            installed,
            configured,
        }
    }

    /// Whether every configured model is installed
    pub fn all_available(&self) -> bool {
        self.configured.iter().all(|m| m.available)
    }

    fn role_of(&self, installed_name: &str) -> Option<&'static str> {
        self.configured
            .iter()
            .find(|m| model_matches(&m.name, installed_name))
            .map(|m| m.role)
    }
}

impl CommandOutput for ModelsOutput {
    fn to_human(&self) -> String {
        let rows: Vec<(String, Option<&'static str>)> = self
            .installed
            .iter()
            .map(|m| (m.name.clone(), self.role_of(&m.name)))
            .collect();

        let mut lines = vec![
            format!("Models on {}:", self.base_url),
            TableFormatter::new().format_models(&rows),
        ];

        for model in &self.configured {
            let marker = if model.available {
                console::style("✓").green()
            } else {
                console::style("✗").red()
            };
            let state = if model.available { "available" } else { "not installed" };
            lines.push(format!("{marker} {} model {}: {state}", model.role, model.name));
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(config: Config, json_mode: bool) -> Result<()> {
    let client = ollama_client(&config)?;
    let installed = client
        .installed_models()
        .await
        .with_context(|| format!("Failed to list models on {}", client.base_url()))?;

    let result = ModelsOutput::new(client.base_url(), installed, &config);
    if !result.all_available() {
        tracing::warn!("Configured models missing; pull them with `ollama pull <model>`");
    }

    output(&result, json_mode);
    Ok(())
}
