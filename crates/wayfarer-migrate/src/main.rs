//! Wayfarer Migrate — applies pending schema migrations and exits.

use anyhow::Context;
use wayfarer_config::{AppConfig, config::load_dotenv, telemetry};
use wayfarer_db::{DbConfig, DbManager};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    let config = AppConfig::from_env().context("loading configuration")?;
    telemetry::init_tracing(config.run_mode)?;

    tracing::info!(run_mode = %config.run_mode, "Starting Wayfarer migrations...");

    let db = DbManager::connect(&DbConfig::from(&config))
        .await
        .context("connecting to SurrealDB")?;
    wayfarer_db::run_migrations(db.client())
        .await
        .context("applying migrations")?;

    tracing::info!("Schema is up to date.");
    Ok(())
}
