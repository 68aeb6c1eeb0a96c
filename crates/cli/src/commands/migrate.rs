//! Database migration command.
//!
//! # Environment Variables
//!
//! - `API_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! Migration files live in `crates/api/migrations/` and are embedded into the
//! binary at build time.

use srrobot_api::config::ApiConfig;
use srrobot_api::db;

use super::CliError;

/// Apply every pending migration.
pub async fn run() -> Result<(), CliError> {
    let config = ApiConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!(
        available = db::MIGRATOR.iter().count(),
        "Running migrations..."
    );
    db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
