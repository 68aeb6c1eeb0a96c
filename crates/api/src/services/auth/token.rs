//! Bearer token issuing and verification.
//!
//! Tokens are HS256 JWTs carrying the principal's internal ID and role:
//!
//! ```json
//! { "sub": 12, "rol": "admin", "iat": 1767225600, "exp": 1767229200 }
//! ```
//!
//! Expiry is checked against an explicit `now`, which makes [`authorize`] a
//! pure function of the token, the signing key, the required roles and the
//! clock.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use srrobot_core::{PrincipalId, Role, RoleSet};

use super::AccessError;

/// Lifetime of an issued token.
pub const TOKEN_TTL: Duration = Duration::hours(1);

/// JWT payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Internal principal ID.
    pub sub: PrincipalId,
    /// Role at the time of issue.
    pub rol: Role,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// The verified caller of a protected route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentPrincipal {
    pub id: PrincipalId,
    pub role: Role,
}

/// Signs and verifies tokens with one shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// Create a signer from the configured secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let key = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against the caller's clock in `verify`.
        validation.validate_exp = false;

        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation,
        }
    }

    /// Issue a token for `id` with `role`, valid for [`TOKEN_TTL`] from `now`.
    ///
    /// # Errors
    ///
    /// Returns a `jsonwebtoken` error if encoding fails.
    pub fn issue(
        &self,
        id: PrincipalId,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: id,
            rol: role,
            iat: now.timestamp(),
            exp: (now + TOKEN_TTL).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Verify a token's signature and expiry.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::InvalidToken` for a bad signature, a malformed
    /// token, or a token whose `exp` is not after `now`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AccessError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            AccessError::InvalidToken
        })?;

        if data.claims.exp <= now.timestamp() {
            return Err(AccessError::InvalidToken);
        }

        Ok(data.claims)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
#[must_use]
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Decide whether a request may proceed.
///
/// # Errors
///
/// - `MissingToken` when no bearer token is present
/// - `InvalidToken` when verification fails or the token expired
/// - `Forbidden` when the token's role is outside `required`
pub fn authorize(
    authorization: Option<&str>,
    signer: &TokenSigner,
    required: RoleSet,
    now: DateTime<Utc>,
) -> Result<CurrentPrincipal, AccessError> {
    let token = authorization
        .and_then(bearer_token)
        .ok_or(AccessError::MissingToken)?;

    let claims = signer.verify(token, now)?;

    if !required.contains(claims.rol) {
        return Err(AccessError::Forbidden(required));
    }

    Ok(CurrentPrincipal {
        id: claims.sub,
        role: claims.rol,
    })
}
