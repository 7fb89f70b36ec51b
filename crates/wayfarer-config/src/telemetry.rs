//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::RunMode;
use crate::error::ConfigError;

const DEFAULT_DIRECTIVE: &str = "wayfarer=info";

/// Builds the log filter for a run mode.
///
/// Test runs get a filter that disables every level, so info, warn and
/// error output are all discarded. Other modes honour `RUST_LOG` and fall
/// back to `wayfarer=info`.
pub fn env_filter(mode: RunMode) -> EnvFilter {
    match mode {
        RunMode::Test => EnvFilter::new("off"),
        RunMode::Development | RunMode::Production => {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
        }
    }
}

/// Install the global tracing subscriber.
///
/// Production logs are JSON; development logs use the human-readable
/// formatter. Fails if a global subscriber is already installed.
pub fn init_tracing(mode: RunMode) -> Result<(), ConfigError> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter(mode));

    let result = match mode {
        RunMode::Production => builder.json().try_init(),
        RunMode::Development | RunMode::Test => builder.try_init(),
    };

    result.map_err(|e| ConfigError::Telemetry(e.to_string()))
}
