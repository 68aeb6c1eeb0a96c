//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `API_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `API_HOST` - Bind address (default: 0.0.0.0)
//! - `API_PORT` - Listen port (falls back to `PORT`, default: 3000)
//! - `JWT_SECRET` - Token signing secret (min 32 chars, high entropy). When
//!   unset a random secret is generated for this process only.
//! - `API_CORPORATE_DOMAIN` - Email domain reserved for staff (default: srrobot.com)
//! - `API_CORS_ORIGINS` - Comma-separated allowed origins (default: `http://localhost:5173`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const GENERATED_SECRET_BYTES: usize = 32;

/// Default email domain reserved for staff accounts.
pub const DEFAULT_CORPORATE_DOMAIN: &str = "srrobot.com";

/// Log target of the generated-secret notice. Kept out of Sentry.
pub const SECRET_NOTICE_TARGET: &str = "srrobot_api::secret";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Where the token signing secret came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretSource {
    /// Read from `JWT_SECRET`.
    Environment,
    /// Generated at startup; tokens die with the process.
    Generated,
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Token signing settings
    pub auth: AuthConfig,
    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Authentication and access-policy configuration.
///
/// Implements `Debug` manually to redact the signing secret.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret used to sign bearer tokens
    pub jwt_secret: SecretString,
    /// Whether the secret was configured or generated
    pub secret_source: SecretSource,
    /// Email domain reserved for `admin`/`superadmin` accounts
    pub corporate_domain: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("secret_source", &self.secret_source)
            .field("corporate_domain", &self.corporate_domain)
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the configured signing secret fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("API_DATABASE_URL")?;
        let host = get_env_or_default("API_HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("API_HOST".to_string(), e.to_string()))?;
        let port = get_optional_env("API_PORT")
            .or_else(|| get_optional_env("PORT"))
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("API_PORT".to_string(), e.to_string()))?;

        let auth = AuthConfig::from_env()?;
        let cors_origins = parse_origins(&get_env_or_default(
            "API_CORS_ORIGINS",
            "http://localhost:5173",
        ));

        Ok(Self {
            database_url,
            host,
            port,
            auth,
            cors_origins,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: get_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let (jwt_secret, secret_source) = match get_optional_env("JWT_SECRET") {
            Some(value) => {
                let secret = SecretString::from(value);
                validate_jwt_secret(&secret, "JWT_SECRET")?;
                validate_secret_strength(secret.expose_secret(), "JWT_SECRET")?;
                (secret, SecretSource::Environment)
            }
            None => (generate_secret(), SecretSource::Generated),
        };

        let corporate_domain = get_env_or_default("API_CORPORATE_DOMAIN", DEFAULT_CORPORATE_DOMAIN)
            .trim()
            .trim_start_matches('@')
            .to_ascii_lowercase();
        if corporate_domain.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "API_CORPORATE_DOMAIN".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            jwt_secret,
            secret_source,
            corporate_domain,
        })
    }

    /// Console notice carrying a generated secret so the operator can persist it.
    ///
    /// `None` when the secret came from `JWT_SECRET`.
    #[must_use]
    pub fn generated_secret_notice(&self) -> Option<String> {
        (self.secret_source == SecretSource::Generated).then(|| {
            format!(
                "JWT_SECRET is not set; generated a signing secret for this run. \
                 Tokens stop verifying after a restart unless it is saved to .env: JWT_SECRET={}",
                self.jwt_secret.expose_secret()
            )
        })
    }
}

/// Generate a random hex-encoded signing secret.
#[must_use]
pub fn generate_secret() -> SecretString {
    let mut bytes = [0u8; GENERATED_SECRET_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    SecretString::from(hex::encode(bytes))
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse a sample rate in `[0.0, 1.0]`.
fn get_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    let rate = raw
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be between 0.0 and 1.0".to_string(),
        ));
    }
    Ok(rate)
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Validate that a signing secret meets minimum length requirements.
fn validate_jwt_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_JWT_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-jwt-key-here-0123456789abcdef", "JWT_SECRET");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength(&"ab".repeat(20), "JWT_SECRET");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_generated_secret_passes_validation() {
        let secret = generate_secret();
        assert_eq!(secret.expose_secret().len(), GENERATED_SECRET_BYTES * 2);
        assert!(validate_jwt_secret(&secret, "JWT_SECRET").is_ok());
        assert!(validate_secret_strength(secret.expose_secret(), "JWT_SECRET").is_ok());
    }

    #[test]
    fn test_generated_secrets_differ() {
        let a = generate_secret();
        let b = generate_secret();
        assert_ne!(a.expose_secret(), b.expose_secret());
    }

    #[test]
    fn test_validate_jwt_secret_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_jwt_secret(&secret, "JWT_SECRET").is_err());
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins(" http://localhost:5173, ,https://shop.srrobot.com "),
            vec![
                "http://localhost:5173".to_string(),
                "https://shop.srrobot.com".to_string()
            ]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_socket_addr() {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            auth: AuthConfig {
                jwt_secret: generate_secret(),
                secret_source: SecretSource::Generated,
                corporate_domain: DEFAULT_CORPORATE_DOMAIN.to_string(),
            },
            cors_origins: vec![],
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_auth_config_debug_redacts_secret() {
        let config = AuthConfig {
            jwt_secret: SecretString::from("super_secret_signing_value"),
            secret_source: SecretSource::Environment,
            corporate_domain: "srrobot.com".to_string(),
        };

        assert_eq!(config.generated_secret_notice(), None);

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("srrobot.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_signing_value"));
    }

    #[test]
    fn test_generated_secret_notice_carries_the_secret() {
        let config = AuthConfig {
            jwt_secret: generate_secret(),
            secret_source: SecretSource::Generated,
            corporate_domain: DEFAULT_CORPORATE_DOMAIN.to_string(),
        };

        let notice = config.generated_secret_notice().unwrap();
        let expected = format!("JWT_SECRET={}", config.jwt_secret.expose_secret());
        assert!(notice.ends_with(&expected));
        assert_eq!(config.jwt_secret.expose_secret().len(), GENERATED_SECRET_BYTES * 2);
    }
}
