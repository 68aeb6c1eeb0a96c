//! Product route handlers.
//!
//! Reads are public; writes need an `admin` or the `superadmin`.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;

use srrobot_core::ProductId;

use super::MessageResponse;
use super::extract::{IdPath, JsonBody};
use crate::error::Result;
use crate::middleware::RequireStaff;
use crate::models::{Product, ProductInput};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub producto: Product,
}

#[derive(Debug, Serialize)]
pub struct ProductChangedResponse {
    pub mensaje: &'static str,
    pub producto: Product,
}

/// List every product.
///
/// GET /api/productos
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.catalog().list_products().await?))
}

/// Get one product.
///
/// GET /api/productos/{id}
pub async fn show(
    State(state): State<AppState>,
    IdPath(id): IdPath<ProductId>,
) -> Result<Json<ProductResponse>> {
    let producto = state.catalog().get_product(id).await?;
    Ok(Json(ProductResponse { producto }))
}

/// Create a product and announce it on the real-time channel.
///
/// POST /api/productos
#[instrument(skip_all, fields(principal_id = %caller.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(caller): RequireStaff,
    JsonBody(input): JsonBody<ProductInput>,
) -> Result<(StatusCode, Json<ProductChangedResponse>)> {
    let producto = state.catalog().create_product(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductChangedResponse {
            mensaje: "Producto creado con éxito",
            producto,
        }),
    ))
}

/// Replace a product's editable fields.
///
/// PUT /api/productos/{id}
#[instrument(skip_all, fields(principal_id = %caller.id, product_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(caller): RequireStaff,
    IdPath(id): IdPath<ProductId>,
    JsonBody(input): JsonBody<ProductInput>,
) -> Result<Json<ProductChangedResponse>> {
    let producto = state.catalog().update_product(id, &input).await?;

    Ok(Json(ProductChangedResponse {
        mensaje: "Producto actualizado con éxito",
        producto,
    }))
}

/// Delete a product.
///
/// DELETE /api/productos/{id}
#[instrument(skip_all, fields(principal_id = %caller.id, product_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireStaff(caller): RequireStaff,
    IdPath(id): IdPath<ProductId>,
) -> Result<Json<MessageResponse>> {
    state.catalog().delete_product(id).await?;

    Ok(Json(MessageResponse {
        mensaje: "Producto eliminado con éxito",
    }))
}
