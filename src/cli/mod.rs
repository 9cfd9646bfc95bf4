//! Command-line interface for docrag.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

use crate::domain::errors::RagError;
use crate::infrastructure::config::ConfigError;

/// Exit code for failures of the engine or its backends
const EXIT_FAILURE: i32 = 1;

/// Exit code for invalid input or configuration
const EXIT_USAGE: i32 = 2;

/// Stable error kind and exit code for a command failure
pub fn classify_error(err: &anyhow::Error) -> (&'static str, i32) {
    if let Some(rag) = err.downcast_ref::<RagError>() {
        let code = match rag.inner() {
            RagError::InvalidQuery(_) | RagError::Config(_) => EXIT_USAGE,
            _ => EXIT_FAILURE,
        };
        return (rag.kind(), code);
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return ("config", EXIT_USAGE);
    }
    ("error", EXIT_FAILURE)
}

/// Render a command failure as text or JSON and exit.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let (kind, code) = classify_error(&err);

    if json_mode {
        let body = serde_json::json!({
            "error": {
                "kind": kind,
                "message": format!("{err:#}"),
            }
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", console::style("Error:").red().bold());
    }

    std::process::exit(code)
}
