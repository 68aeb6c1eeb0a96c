//! CLI subcommands.

pub mod migrate;
pub mod secret;
pub mod superadmin;

use thiserror::Error;

use srrobot_api::config::ConfigError;
use srrobot_api::services::auth::AuthError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Superadmin bootstrap was rejected.
    #[error("{}", .0.message())]
    Auth(#[from] AuthError),
}
