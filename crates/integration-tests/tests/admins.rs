//! Admin management tests (superadmin only).

#![allow(clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use srrobot_integration_tests::{PASSWORD, TestApp};

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_admin_lifecycle(pool: PgPool) {
    let app = TestApp::new(pool);
    let owner = app.superadmin().await;
    let admin = app.admin(&owner, "ventas").await;

    // Superadmin is staff number 1, the first admin is number 2.
    let (status, body) = app.get("/api/superadmin/admins", Some(&owner)).await;
    assert_eq!(status, StatusCode::OK);
    let admins = body["admins"].as_array().cloned().unwrap_or_default();
    assert_eq!(admins.len(), 1);
    assert_eq!(admins[0]["id_usuario"], 2);
    assert_eq!(admins[0]["rol"], "admin");

    let (status, body) = app.get("/api/superadmin/admins/2", Some(&owner)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["admin"]["correo"], "ventas@srrobot.com");

    let (status, body) = app
        .put(
            "/api/superadmin/admins/2",
            Some(&owner),
            json!({ "correo": "ventas@gmail.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["mensaje"], "El correo debe ser corporativo @srrobot.com");

    let (status, body) = app
        .put(
            "/api/superadmin/admins/2",
            Some(&owner),
            json!({ "nombreCompleto": "Ventas Norte" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mensaje"], "Admin actualizado con éxito");
    assert_eq!(body["admin"]["nombreCompleto"], "Ventas Norte");

    // Admins cannot manage other admins.
    let (status, _) = app.get("/api/superadmin/admins", Some(&admin)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.delete("/api/superadmin/admins/2", Some(&owner)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mensaje"], "Admin eliminado con éxito");

    let (status, body) = app.get("/api/superadmin/admins/2", Some(&owner)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["mensaje"], "Admin no encontrado");

    // The deleted admin can no longer log in.
    let (status, _) = app
        .post(
            "/api/auth/iniciar-sesion",
            None,
            json!({ "correo": "ventas@srrobot.com", "contrasena": PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_superadmin_cannot_be_managed_as_admin(pool: PgPool) {
    let app = TestApp::new(pool);
    let owner = app.superadmin().await;

    let (status, _) = app.get("/api/superadmin/admins/1", Some(&owner)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .put(
            "/api/superadmin/admins/1",
            Some(&owner),
            json!({ "nombreCompleto": "Otro" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["mensaje"], "No se puede modificar el superadmin");

    let (status, _) = app.delete("/api/superadmin/admins/1", Some(&owner)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_admin_creation_rules(pool: PgPool) {
    let app = TestApp::new(pool);
    let owner = app.superadmin().await;
    let customer = app.customer("Cliente", "cliente@gmail.com").await;

    let (status, body) = app
        .post(
            "/api/admin/crear-admin",
            Some(&owner),
            json!({ "nombreCompleto": "Externo", "correo": "externo@gmail.com", "contrasena": "x" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["mensaje"], "El correo debe ser corporativo @srrobot.com");

    let (status, body) = app
        .post(
            "/api/admin/crear-admin",
            Some(&customer),
            json!({ "nombreCompleto": "Yo", "correo": "yo@srrobot.com", "contrasena": "x" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["mensaje"], "Acceso denegado: solo superadministradores");

    let admin = app.admin(&owner, "soporte").await;
    let (status, body) = app.get("/api/perfil", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["perfil"]["rol"], "admin");
}
