//! Application configuration loaded from the process environment.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::testing;

pub const ENV_JWT_SECRET: &str = "WAYFARER_JWT_SECRET";
pub const ENV_DATABASE_URL: &str = "WAYFARER_DATABASE_URL";
pub const ENV_DATABASE_NAMESPACE: &str = "WAYFARER_DATABASE_NAMESPACE";
pub const ENV_DATABASE_NAME: &str = "WAYFARER_DATABASE_NAME";
pub const ENV_DATABASE_USERNAME: &str = "WAYFARER_DATABASE_USERNAME";
pub const ENV_DATABASE_PASSWORD: &str = "WAYFARER_DATABASE_PASSWORD";
pub const ENV_RUN_MODE: &str = "WAYFARER_ENV";

/// Which environment the process runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Development,
    Production,
    /// Automated tests: log output is discarded.
    Test,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Development => "development",
            RunMode::Production => "production",
            RunMode::Test => "test",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(RunMode::Development),
            "production" | "prod" => Ok(RunMode::Production),
            "test" => Ok(RunMode::Test),
            other => Err(ConfigError::InvalidRunMode(other.to_string())),
        }
    }
}

/// Process-wide configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// Shared secret used to sign and verify tokens.
    pub jwt_secret: String,
    /// Connection string (e.g., `ws://127.0.0.1:8000` or `mem://`).
    pub database_url: String,
    /// SurrealDB namespace.
    pub database_namespace: String,
    /// SurrealDB database name.
    pub database_name: String,
    /// Root username, if the server requires authentication.
    pub database_username: Option<String>,
    /// Root password, if the server requires authentication.
    pub database_password: Option<String>,
    pub run_mode: RunMode,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("jwt_secret", &"<redacted>")
            .field("database_url", &self.database_url)
            .field("database_namespace", &self.database_namespace)
            .field("database_name", &self.database_name)
            .field("database_username", &self.database_username)
            .field("database_password", &self.database_password.as_ref().map(|_| "<redacted>"))
            .field("run_mode", &self.run_mode)
            .finish()
    }
}

impl AppConfig {
    pub const DEFAULT_DATABASE_URL: &'static str = "ws://127.0.0.1:8000";
    pub const DEFAULT_DATABASE_NAMESPACE: &'static str = "wayfarer";
    pub const DEFAULT_DATABASE_NAME: &'static str = "main";

    /// Read configuration from the process environment.
    ///
    /// Call [`load_dotenv`] first to pick up a `.env` file. Once
    /// [`testing::bootstrap`](crate::testing::bootstrap) has run, the test
    /// configuration it fixed is returned instead.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Some(config) = testing::installed() {
            return Ok(config.clone());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = non_empty(ENV_JWT_SECRET).ok_or(ConfigError::Missing(ENV_JWT_SECRET))?;
        let run_mode = match non_empty(ENV_RUN_MODE) {
            Some(mode) => mode.parse()?,
            None => RunMode::default(),
        };

        Ok(Self {
            jwt_secret,
            database_url: non_empty(ENV_DATABASE_URL)
                .unwrap_or_else(|| Self::DEFAULT_DATABASE_URL.into()),
            database_namespace: non_empty(ENV_DATABASE_NAMESPACE)
                .unwrap_or_else(|| Self::DEFAULT_DATABASE_NAMESPACE.into()),
            database_name: non_empty(ENV_DATABASE_NAME)
                .unwrap_or_else(|| Self::DEFAULT_DATABASE_NAME.into()),
            database_username: non_empty(ENV_DATABASE_USERNAME),
            database_password: non_empty(ENV_DATABASE_PASSWORD),
            run_mode,
        })
    }

    pub fn is_test(&self) -> bool {
        self.run_mode == RunMode::Test
    }
}

/// Load variables from a `.env` file in the working directory or its
/// parents, if one exists. Variables already set are not overridden.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_fill_everything_but_the_secret() {
        let config = AppConfig::from_lookup(lookup_from(&[(ENV_JWT_SECRET, "s3cret")])).unwrap();
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.database_url, AppConfig::DEFAULT_DATABASE_URL);
        assert_eq!(config.database_namespace, "wayfarer");
        assert_eq!(config.database_name, "main");
        assert!(config.database_username.is_none());
        assert_eq!(config.run_mode, RunMode::Development);
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[(ENV_JWT_SECRET, " ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ENV_JWT_SECRET)));
    }

    #[test]
    fn reads_run_mode_and_database() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_JWT_SECRET, "k"),
            (ENV_RUN_MODE, "TEST"),
            (ENV_DATABASE_URL, "mem://"),
            (ENV_DATABASE_USERNAME, "root"),
            (ENV_DATABASE_PASSWORD, "root"),
        ]))
        .unwrap();
        assert!(config.is_test());
        assert_eq!(config.database_url, "mem://");
        assert_eq!(config.database_username.as_deref(), Some("root"));
    }

    #[test]
    fn unknown_run_mode_is_rejected() {
        let err = "staging".parse::<RunMode>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRunMode(ref m) if m == "staging"));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_JWT_SECRET, "very-secret"),
            (ENV_DATABASE_PASSWORD, "hunter2"),
        ]))
        .unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("very-secret"));
        assert!(!rendered.contains("hunter2"));
    }
}
