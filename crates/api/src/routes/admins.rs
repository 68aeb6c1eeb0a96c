//! Admin management route handlers (superadmin only).

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;

use srrobot_core::PrincipalNumber;

use super::MessageResponse;
use super::auth::CreatedResponse;
use super::extract::{IdPath, JsonBody};
use crate::error::Result;
use crate::middleware::RequireSuperAdmin;
use crate::models::{CredentialsInput, PrincipalView, ProfileInput};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AdminListResponse {
    pub admins: Vec<PrincipalView>,
}

#[derive(Debug, Serialize)]
pub struct AdminResponse {
    pub admin: PrincipalView,
}

#[derive(Debug, Serialize)]
pub struct AdminChangedResponse {
    pub mensaje: &'static str,
    pub admin: PrincipalView,
}

/// Create an admin with a corporate email.
///
/// POST /api/admin/crear-admin
#[instrument(skip_all, fields(principal_id = %caller.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireSuperAdmin(caller): RequireSuperAdmin,
    JsonBody(input): JsonBody<CredentialsInput>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let principal = state.auth().create_admin(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            mensaje: "Admin creado con éxito",
            rol: principal.role,
        }),
    ))
}

/// List admins.
///
/// GET /api/superadmin/admins
pub async fn index(
    State(state): State<AppState>,
    RequireSuperAdmin(_caller): RequireSuperAdmin,
) -> Result<Json<AdminListResponse>> {
    let admins = state.auth().list_admins().await?;

    Ok(Json(AdminListResponse {
        admins: admins.into_iter().map(Into::into).collect(),
    }))
}

/// Get one admin by number.
///
/// GET /api/superadmin/admins/{id}
pub async fn show(
    State(state): State<AppState>,
    RequireSuperAdmin(_caller): RequireSuperAdmin,
    IdPath(number): IdPath<PrincipalNumber>,
) -> Result<Json<AdminResponse>> {
    let admin = state.auth().get_admin(number).await?;
    Ok(Json(AdminResponse {
        admin: admin.into(),
    }))
}

/// Update an admin's name, email or password.
///
/// PUT /api/superadmin/admins/{id}
#[instrument(skip_all, fields(principal_id = %caller.id, number = %number))]
pub async fn update(
    State(state): State<AppState>,
    RequireSuperAdmin(caller): RequireSuperAdmin,
    IdPath(number): IdPath<PrincipalNumber>,
    JsonBody(input): JsonBody<ProfileInput>,
) -> Result<Json<AdminChangedResponse>> {
    let admin = state.auth().update_admin(number, &input).await?;

    Ok(Json(AdminChangedResponse {
        mensaje: "Admin actualizado con éxito",
        admin: admin.into(),
    }))
}

/// Delete an admin.
///
/// DELETE /api/superadmin/admins/{id}
#[instrument(skip_all, fields(principal_id = %caller.id, number = %number))]
pub async fn delete(
    State(state): State<AppState>,
    RequireSuperAdmin(caller): RequireSuperAdmin,
    IdPath(number): IdPath<PrincipalNumber>,
) -> Result<Json<MessageResponse>> {
    state.auth().delete_admin(number).await?;

    Ok(Json(MessageResponse {
        mensaje: "Admin eliminado con éxito",
    }))
}
