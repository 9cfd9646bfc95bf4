//! Infrastructure layer module
//!
//! Cross-cutting concerns that sit outside the domain:
//! - Configuration management (figment layering and validation)
//! - Logging infrastructure (tracing subscribers and rotation)

pub mod config;
pub mod logging;
