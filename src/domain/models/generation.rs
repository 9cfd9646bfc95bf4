//! Answer generation models
//!
//! Chat messages exchanged with the language model, sampling options and the
//! generation policy (fallback text, grounding allowance).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling options passed to the chat backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChatOptions {
    /// Sampling temperature; low values bias towards deterministic output
    pub temperature: f32,

    /// Context window size in tokens
    pub context_window: u32,
}

/// Default text returned when no grounded answer can be produced.
pub const DEFAULT_FALLBACK_RESPONSE: &str =
    "No relevant information found in the knowledge base.";

/// Answer generation policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GenerationConfig {
    /// Sampling temperature for the chat completion
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Context window requested from the chat backend
    #[serde(default = "default_context_window")]
    pub context_window: u32,

    /// Text returned whenever the question cannot be answered from context
    #[serde(default = "default_fallback_response")]
    pub fallback_response: String,

    /// Answer terms absent from the context tolerated before rejecting an answer
    #[serde(default = "default_max_unsupported_terms")]
    pub max_unsupported_terms: usize,

    /// Minimum word length considered by the grounding check
    #[serde(default = "default_min_token_length")]
    pub min_token_length: usize,

    /// Surface truncated backend errors instead of the fallback text
    #[serde(default)]
    pub diagnostic: bool,
}

const fn default_temperature() -> f32 {
    0.1
}

const fn default_context_window() -> u32 {
    4096
}

fn default_fallback_response() -> String {
    DEFAULT_FALLBACK_RESPONSE.to_string()
}

const fn default_max_unsupported_terms() -> usize {
    2
}

const fn default_min_token_length() -> usize {
    4
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            context_window: default_context_window(),
            fallback_response: default_fallback_response(),
            max_unsupported_terms: default_max_unsupported_terms(),
            min_token_length: default_min_token_length(),
            diagnostic: false,
        }
    }
}

impl GenerationConfig {
    /// Chat options derived from this policy
    pub fn chat_options(&self) -> ChatOptions {
        ChatOptions {
            temperature: self.temperature,
            context_window: self.context_window,
        }
    }
}
