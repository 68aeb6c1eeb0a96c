//! Own-profile route handlers for any authenticated principal.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use super::extract::JsonBody;
use crate::error::Result;
use crate::middleware::Authenticated;
use crate::models::{PrincipalView, ProfileInput};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub perfil: PrincipalView,
}

#[derive(Debug, Serialize)]
pub struct ProfileChangedResponse {
    pub mensaje: &'static str,
    pub perfil: PrincipalView,
}

/// Get the caller's profile. Never includes the password hash.
///
/// GET /api/perfil
pub async fn show(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
) -> Result<Json<ProfileResponse>> {
    let principal = state.auth().profile(&caller).await?;
    Ok(Json(ProfileResponse {
        perfil: principal.into(),
    }))
}

/// Update the caller's name, email or password.
///
/// PUT /api/perfil
#[instrument(skip_all, fields(principal_id = %caller.id))]
pub async fn update(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    JsonBody(input): JsonBody<ProfileInput>,
) -> Result<Json<ProfileChangedResponse>> {
    let principal = state.auth().update_profile(&caller, &input).await?;

    Ok(Json(ProfileChangedResponse {
        mensaje: "Perfil actualizado con éxito",
        perfil: principal.into(),
    }))
}
