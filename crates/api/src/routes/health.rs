//! Liveness and readiness endpoints.

use axum::{extract::State, http::StatusCode};

use crate::error::AppError;
use crate::state::AppState;

/// GET /
pub async fn welcome() -> &'static str {
    "Welcome to my API"
}

/// Fallback for unmatched paths, so 404s share the error body shape.
pub async fn not_found() -> AppError {
    AppError::NotFound("Ruta no encontrada".to_string())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
