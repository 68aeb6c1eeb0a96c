//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                  - Welcome message
//! GET  /health                            - Liveness
//! GET  /health/ready                      - Database readiness
//! GET  /ws                                - Real-time channel (WebSocket)
//!
//! # Auth
//! POST /api/auth/registrar                - Register a customer
//! POST /api/auth/registrar-cliente        - Register a customer
//! POST /api/auth/iniciar-sesion           - Log in, returns a bearer token
//! POST /api/setup/crear-superadmin        - One-time superadmin bootstrap
//!
//! # Catalog
//! GET  /api/productos                     - Product list
//! GET  /api/productos/{id}                - Product detail
//! POST /api/productos                     - Create (staff)
//! PUT  /api/productos/{id}                - Replace (staff)
//! DELETE /api/productos/{id}              - Delete (staff)
//! GET  /api/categorias                    - Category list
//!
//! # Back office (superadmin)
//! GET  /api/admin/categorias              - Category list
//! POST /api/admin/categorias              - Create category
//! POST /api/admin/crear-categoria         - Create category
//! PUT  /api/admin/categorias/{id}         - Update category
//! DELETE /api/admin/categorias/{id}       - Delete category
//! POST /api/admin/crear-admin             - Create admin
//! GET  /api/superadmin/admins             - Admin list
//! GET  /api/superadmin/admins/{id}        - Admin detail
//! PUT  /api/superadmin/admins/{id}        - Update admin
//! DELETE /api/superadmin/admins/{id}      - Delete admin
//!
//! # Profile (any token)
//! GET  /api/perfil                        - Own profile
//! PUT  /api/perfil                        - Update own profile
//! ```
//!
//! Unmatched paths answer 404 with the usual `{"mensaje"}` body.

pub mod admins;
pub mod auth;
pub mod categories;
pub mod extract;
pub mod health;
pub mod products;
pub mod profile;
pub mod realtime;

use axum::{
    Router,
    routing::{get, post, put},
};
use serde::Serialize;

use crate::state::AppState;

/// Body of responses that only carry a confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub mensaje: &'static str,
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/registrar", post(auth::register))
        .route("/registrar-cliente", post(auth::register_customer))
        .route("/iniciar-sesion", post(auth::login))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the back-office routes router (`/api/admin`).
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/categorias",
            get(categories::admin_index).post(categories::create),
        )
        .route("/crear-categoria", post(categories::create))
        .route(
            "/categorias/{id}",
            put(categories::update).delete(categories::delete),
        )
        .route("/crear-admin", post(admins::create))
}

/// Create the admin management routes router (`/api/superadmin`).
pub fn superadmin_routes() -> Router<AppState> {
    Router::new()
        .route("/admins", get(admins::index))
        .route(
            "/admins/{id}",
            get(admins::show).put(admins::update).delete(admins::delete),
        )
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::welcome))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/ws", get(realtime::connect))
        .nest("/api/auth", auth_routes())
        .route("/api/setup/crear-superadmin", post(auth::bootstrap_superadmin))
        .nest("/api/productos", product_routes())
        .route("/api/categorias", get(categories::index))
        .nest("/api/admin", admin_routes())
        .nest("/api/superadmin", superadmin_routes())
        .route("/api/perfil", get(profile::show).put(profile::update))
        .fallback(health::not_found)
}
