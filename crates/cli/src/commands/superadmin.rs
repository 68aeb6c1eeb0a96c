//! Superadmin bootstrap command.
//!
//! Applies the same rules as `POST /api/setup/crear-superadmin`: corporate
//! email, unique email, and at most one superadmin ever.

use srrobot_api::config::ApiConfig;
use srrobot_api::db;
use srrobot_api::models::CredentialsInput;
use srrobot_api::services::AuthService;
use srrobot_api::services::auth::AccessPolicy;

use super::CliError;

/// Create the superadmin.
pub async fn create(name: &str, email: &str, password: &str) -> Result<(), CliError> {
    let config = ApiConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    let policy = AccessPolicy::new(&config.auth.corporate_domain);
    let input = CredentialsInput {
        full_name: Some(name.to_owned()),
        email: Some(email.to_owned()),
        password: Some(password.to_owned()),
    };

    let principal = AuthService::new(&pool, &policy)
        .bootstrap_superadmin(&input)
        .await?;

    tracing::info!(
        "Superadmin created successfully! Number: {}, Email: {}",
        principal.number,
        principal.email
    );
    Ok(())
}
