//! Bearer-token extractors for protected routes.
//!
//! Each extractor verifies the `Authorization: Bearer <token>` header against
//! the state's [`TokenSigner`](crate::services::auth::TokenSigner) and checks
//! the token's role against a fixed [`RoleSet`]. Rejections are ordinary
//! [`AppError`]s, so they share the `{ "mensaje": ... }` body:
//!
//! | Situation | Status |
//! |---|---|
//! | no bearer token | 401 |
//! | bad signature, malformed or expired token | 403 |
//! | role outside the required set | 403 |
//!
//! ```rust,ignore
//! async fn delete_product(
//!     RequireStaff(caller): RequireStaff,
//!     State(state): State<AppState>,
//! ) -> Result<impl IntoResponse> { ... }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;

use srrobot_core::RoleSet;

use crate::error::{AppError, set_sentry_user};
use crate::services::auth::{CurrentPrincipal, authorize};
use crate::state::AppState;

/// Verify the request's bearer token and require one of `required`.
fn authorize_request(
    parts: &Parts,
    state: &AppState,
    required: RoleSet,
) -> Result<CurrentPrincipal, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let principal = authorize(header, state.tokens(), required, Utc::now())?;
    set_sentry_user(&principal.id, principal.role.as_str());

    Ok(principal)
}

/// Any authenticated principal.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated(pub CurrentPrincipal);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        authorize_request(parts, state, RoleSet::ANY).map(Self)
    }
}

/// An `admin` or the `superadmin`.
#[derive(Debug, Clone, Copy)]
pub struct RequireStaff(pub CurrentPrincipal);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        authorize_request(parts, state, RoleSet::STAFF).map(Self)
    }
}

/// Only the `superadmin`.
#[derive(Debug, Clone, Copy)]
pub struct RequireSuperAdmin(pub CurrentPrincipal);

impl FromRequestParts<AppState> for RequireSuperAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        authorize_request(parts, state, RoleSet::SUPERADMIN).map(Self)
    }
}
