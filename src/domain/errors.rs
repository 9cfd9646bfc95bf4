//! Domain errors for the docrag retrieval engine.

use thiserror::Error;

/// Maximum number of characters of an error payload that reaches logs or users.
pub const ERROR_SUMMARY_MAX_CHARS: usize = 100;

fn format_models(models: &[String]) -> String {
    if models.is_empty() {
        "none".to_string()
    } else {
        models.join(", ")
    }
}

/// Errors raised by the retrieval and answer-synthesis engine.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RagError {
    #[error("Model {model} not found. Available models: {}", format_models(.available))]
    ModelUnavailable { model: String, available: Vec<String> },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Chat completion error: {0}")]
    Chat(String),

    #[error("Vector store initialization failed: {0}")]
    StoreInitialization(String),

    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A backend failure that will not go away on retry (rejected request,
    /// malformed response). Reports the kind of the wrapped error.
    #[error(transparent)]
    Permanent(Box<RagError>),
}

pub type RagResult<T> = Result<T, RagError>;

impl RagError {
    /// Returns true if the failure came from a model-serving backend call and
    /// may succeed when attempted again.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Provider(_) | Self::Embedding(_) | Self::Chat(_)
        )
    }

    /// Mark this error as not worth retrying.
    pub fn permanent(self) -> Self {
        match self {
            Self::Permanent(_) => self,
            other => Self::Permanent(Box::new(other)),
        }
    }

    /// The underlying error, looking through [`RagError::Permanent`].
    pub fn inner(&self) -> &RagError {
        match self {
            Self::Permanent(inner) => inner.inner(),
            other => other,
        }
    }

    /// Returns true if this error must abort startup.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ModelUnavailable { .. }
                | Self::StoreInitialization(_)
                | Self::Document(_)
                | Self::Config(_)
        ) || matches!(self, Self::Permanent(inner) if inner.is_fatal())
    }

    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ModelUnavailable { .. } => "model_unavailable",
            Self::Provider(_) => "provider",
            Self::Embedding(_) => "embedding",
            Self::Chat(_) => "chat",
            Self::StoreInitialization(_) => "store_initialization",
            Self::Retrieval(_) => "retrieval",
            Self::Document(_) => "document",
            Self::InvalidQuery(_) => "invalid_query",
            Self::Config(_) => "config",
            Self::Permanent(inner) => inner.kind(),
        }
    }

    /// The error message truncated to [`ERROR_SUMMARY_MAX_CHARS`].
    pub fn summary(&self) -> String {
        truncate_chars(&self.to_string(), ERROR_SUMMARY_MAX_CHARS)
    }
}

/// Truncate `text` to at most `max_chars` characters, appending "..." when cut.
///
/// The result never exceeds `max_chars` characters, ellipsis included.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(&"..."[..max_chars.min(3)]);
    truncated
}
