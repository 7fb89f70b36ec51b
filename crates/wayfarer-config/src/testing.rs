//! Process-wide bootstrap for automated test runs.
//!
//! The first call to [`bootstrap`] fixes the test configuration for the
//! rest of the process and installs a tracing subscriber that discards
//! all output. Later calls return the same configuration, and so does
//! [`AppConfig::from_env`].

use std::sync::OnceLock;

use tracing::level_filters::LevelFilter;

use crate::config::{AppConfig, RunMode};
use crate::telemetry;

pub const TEST_JWT_SECRET: &str = "wayfarer-test-secret";
/// Every `mem://` connection opens a fresh, private datastore.
pub const TEST_DATABASE_URL: &str = "mem://";
pub const TEST_DATABASE_NAMESPACE: &str = "wayfarer_test";
pub const TEST_DATABASE_NAME: &str = "test";

static TEST_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Configuration used by test runs.
pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: TEST_JWT_SECRET.into(),
        database_url: TEST_DATABASE_URL.into(),
        database_namespace: TEST_DATABASE_NAMESPACE.into(),
        database_name: TEST_DATABASE_NAME.into(),
        database_username: None,
        database_password: None,
        run_mode: RunMode::Test,
    }
}

/// Initialise the test environment once per process.
///
/// # Panics
///
/// Panics if the silent subscriber cannot be installed and whatever
/// subscriber already owns the process still lets events through.
pub fn bootstrap() -> &'static AppConfig {
    TEST_CONFIG.get_or_init(|| {
        let config = test_config();
        if let Err(err) = telemetry::init_tracing(config.run_mode) {
            assert!(
                logging_silenced(),
                "test run cannot silence logging: {err}"
            );
        }
        config
    })
}

/// The configuration fixed by [`bootstrap`], if it has run.
pub(crate) fn installed() -> Option<&'static AppConfig> {
    TEST_CONFIG.get()
}

/// Whether the active subscribers discard events at every level.
pub fn logging_silenced() -> bool {
    LevelFilter::current() == LevelFilter::OFF
}
