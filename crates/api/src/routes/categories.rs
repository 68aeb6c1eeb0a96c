//! Category route handlers.
//!
//! The public listing is open; every write is reserved to the superadmin.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;

use srrobot_core::CategoryId;

use super::MessageResponse;
use super::extract::{IdPath, JsonBody};
use crate::error::Result;
use crate::middleware::RequireSuperAdmin;
use crate::models::{Category, CategoryInput};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub categorias: Vec<Category>,
}

#[derive(Debug, Serialize)]
pub struct CategoryChangedResponse {
    pub mensaje: &'static str,
    pub categoria: Category,
}

/// List categories for the storefront.
///
/// GET /api/categorias
pub async fn index(State(state): State<AppState>) -> Result<Json<CategoryListResponse>> {
    let categorias = state.catalog().list_categories().await?;
    Ok(Json(CategoryListResponse { categorias }))
}

/// List categories for the back office.
///
/// GET /api/admin/categorias
pub async fn admin_index(
    State(state): State<AppState>,
    RequireSuperAdmin(_caller): RequireSuperAdmin,
) -> Result<Json<CategoryListResponse>> {
    let categorias = state.catalog().list_categories().await?;
    Ok(Json(CategoryListResponse { categorias }))
}

/// Create a category.
///
/// POST /api/admin/categorias, POST /api/admin/crear-categoria
#[instrument(skip_all, fields(principal_id = %caller.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireSuperAdmin(caller): RequireSuperAdmin,
    JsonBody(input): JsonBody<CategoryInput>,
) -> Result<(StatusCode, Json<CategoryChangedResponse>)> {
    let categoria = state.catalog().create_category(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CategoryChangedResponse {
            mensaje: "Categoría creada con éxito",
            categoria,
        }),
    ))
}

/// Rename a category or change its description.
///
/// PUT /api/admin/categorias/{id}
#[instrument(skip_all, fields(principal_id = %caller.id, category_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireSuperAdmin(caller): RequireSuperAdmin,
    IdPath(id): IdPath<CategoryId>,
    JsonBody(input): JsonBody<CategoryInput>,
) -> Result<Json<CategoryChangedResponse>> {
    let categoria = state.catalog().update_category(id, &input).await?;

    Ok(Json(CategoryChangedResponse {
        mensaje: "Categoría actualizada con éxito",
        categoria,
    }))
}

/// Delete a category no product uses.
///
/// DELETE /api/admin/categorias/{id}
#[instrument(skip_all, fields(principal_id = %caller.id, category_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireSuperAdmin(caller): RequireSuperAdmin,
    IdPath(id): IdPath<CategoryId>,
) -> Result<Json<MessageResponse>> {
    state.catalog().delete_category(id).await?;

    Ok(Json(MessageResponse {
        mensaje: "Categoría eliminada con éxito",
    }))
}
