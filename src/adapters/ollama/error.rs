use thiserror::Error;

use crate::domain::errors::{truncate_chars, RagError, ERROR_SUMMARY_MAX_CHARS};

/// Errors that can occur when talking to an Ollama server
#[derive(Error, Debug)]
pub enum OllamaError {
    /// Malformed request (unknown option, bad payload)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Model or endpoint not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server failed while handling the request
    #[error("Server error ({status}): {body}")]
    ServerError { status: u16, body: String },

    /// Connection refused, reset, DNS failure, ...
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl OllamaError {
    /// Whether the same request may succeed later (connection failures, 5xx).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::ServerError { .. })
    }

    /// Report through `kind`, marked permanent unless the call may be retried.
    pub fn classify(self, kind: fn(String) -> RagError) -> RagError {
        let retryable = self.is_retryable();
        let err = kind(self.to_string());
        if retryable {
            err
        } else {
            err.permanent()
        }
    }

    /// Convert into the engine error for a call against `model`.
    ///
    /// A 404 means the model is not installed; everything else goes through
    /// [`OllamaError::classify`].
    pub fn into_rag_error(self, model: &str, kind: fn(String) -> RagError) -> RagError {
        match self {
            Self::NotFound(_) => RagError::ModelUnavailable {
                model: model.to_string(),
                available: Vec::new(),
            },
            other => other.classify(kind),
        }
    }

    /// Create error from HTTP status code and response body.
    ///
    /// The body is truncated so that a verbose server cannot flood logs.
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        let body = truncate_chars(body.trim(), ERROR_SUMMARY_MAX_CHARS);
        match status.as_u16() {
            400 => Self::InvalidRequest(body),
            404 => Self::NotFound(body),
            code @ 500..=599 => Self::ServerError { status: code, body },
            code => Self::Unknown(format!("HTTP {code}: {body}")),
        }
    }
}
