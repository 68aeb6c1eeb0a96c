//! Registration and login route handlers.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use srrobot_core::Role;

use super::extract::JsonBody;
use crate::error::Result;
use crate::models::{CredentialsInput, LoginInput};
use crate::state::AppState;

/// Body returned when a principal is created.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub mensaje: &'static str,
    pub rol: Role,
}

/// Body returned on successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub rol: Role,
}

/// Register a customer.
///
/// POST /api/auth/registrar
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CredentialsInput>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let principal = state.auth().register_customer(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            mensaje: "Usuario registrado",
            rol: principal.role,
        }),
    ))
}

/// Register a customer (storefront form).
///
/// POST /api/auth/registrar-cliente
#[instrument(skip_all)]
pub async fn register_customer(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CredentialsInput>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let principal = state.auth().register_customer(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            mensaje: "Cliente registrado",
            rol: principal.role,
        }),
    ))
}

/// Log in with email and password.
///
/// POST /api/auth/iniciar-sesion
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<LoginInput>,
) -> Result<Json<LoginResponse>> {
    let (token, rol) = state
        .auth()
        .authenticate(
            input.email.as_deref().unwrap_or_default(),
            input.password.as_deref().unwrap_or_default(),
            state.tokens(),
            Utc::now(),
        )
        .await?;

    Ok(Json(LoginResponse { token, rol }))
}

/// Create the one-time superadmin.
///
/// POST /api/setup/crear-superadmin
#[instrument(skip_all)]
pub async fn bootstrap_superadmin(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CredentialsInput>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let principal = state.auth().bootstrap_superadmin(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            mensaje: "Superadmin creado con éxito",
            rol: principal.role,
        }),
    ))
}
