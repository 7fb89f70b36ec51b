//! Wayfarer Config — process configuration, logging setup and the test
//! bootstrap.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod testing;

pub use config::{AppConfig, RunMode};
pub use error::ConfigError;
