use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::Config;

/// Project-local configuration directory
pub const CONFIG_DIR: &str = ".docrag";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "DOCRAG_";

/// Configuration error types
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Backend base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    #[error("Model name for {0} cannot be empty")]
    EmptyModelName(&'static str),

    #[error("Invalid chunking configuration: {0}")]
    InvalidChunking(String),

    #[error("Invalid top_n: {0}. Must be at least 1")]
    InvalidTopN(usize),

    #[error("Invalid similarity_threshold: {0}. Must be between 0 and 1")]
    InvalidThreshold(f32),

    #[error("Invalid build_concurrency: {0}. Must be at least 1")]
    InvalidConcurrency(usize),

    #[error("Invalid temperature: {0}. Must be between 0 and 2")]
    InvalidTemperature(f32),

    #[error("Invalid context_window: {0}. Must be at least 1")]
    InvalidContextWindow(u32),

    #[error("Fallback response cannot be empty")]
    EmptyFallbackResponse,

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .docrag/config.yaml (project config)
    /// 3. .docrag/local.yaml (project local overrides, optional)
    /// 4. Environment variables (DOCRAG_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        Self::load_from_dir(CONFIG_DIR)
    }

    /// Load configuration using `dir` in place of `.docrag/`
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Config> {
        let dir = dir.as_ref();
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    ///
    /// Environment variables still override the file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.backend.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if config.backend.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(0));
        }

        if config.models.embedding.trim().is_empty() {
            return Err(ConfigError::EmptyModelName("embedding"));
        }
        if config.models.language.trim().is_empty() {
            return Err(ConfigError::EmptyModelName("language"));
        }

        config
            .chunking
            .validate()
            .map_err(ConfigError::InvalidChunking)?;

        let retrieval = &config.retrieval;
        if retrieval.top_n == 0 {
            return Err(ConfigError::InvalidTopN(0));
        }
        // The generation cutoff must not fall below the retrieval cutoff
        if !(0.0..=1.0).contains(&retrieval.similarity_threshold) {
            return Err(ConfigError::InvalidThreshold(retrieval.similarity_threshold));
        }
        if retrieval.build_concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency(0));
        }

        let generation = &config.generation;
        if !(0.0..=2.0).contains(&generation.temperature) {
            return Err(ConfigError::InvalidTemperature(generation.temperature));
        }
        if generation.context_window == 0 {
            return Err(ConfigError::InvalidContextWindow(0));
        }
        if generation.fallback_response.trim().is_empty() {
            return Err(ConfigError::EmptyFallbackResponse);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }
}
