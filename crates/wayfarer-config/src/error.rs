//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid run mode '{0}' (expected development, production or test)")]
    InvalidRunMode(String),

    #[error("failed to install tracing subscriber: {0}")]
    Telemetry(String),
}
