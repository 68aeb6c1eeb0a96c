//! Authentication and access-control error types.

use axum::http::StatusCode;
use thiserror::Error;

use srrobot_core::{EmailError, RoleSet};

use crate::db::RepositoryError;
use crate::error::{repository_message, repository_status};

/// Errors that can occur during credential and profile operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required field is missing or blank.
    #[error("missing required fields")]
    MissingFields,

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Email is already registered by some principal.
    #[error("email already in use")]
    EmailInUse,

    /// Staff accounts must use the corporate domain.
    #[error("email must belong to @{0}")]
    CorporateEmailRequired(String),

    /// Customers may not use the corporate domain.
    #[error("customers cannot use corporate emails")]
    CorporateEmailReserved,

    /// The superadmin was already bootstrapped.
    #[error("superadmin already exists")]
    SuperadminExists,

    /// Invalid credentials (wrong password or unknown email).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Update request carried no fields.
    #[error("no fields to update")]
    NothingToUpdate,

    /// Update request did not differ from the stored record.
    #[error("no changes to apply")]
    NoChanges,

    /// The authenticated principal no longer exists.
    #[error("profile not found")]
    ProfileNotFound,

    /// No admin with the requested number.
    #[error("admin not found")]
    AdminNotFound,

    /// The superadmin record cannot be modified.
    #[error("superadmin is immutable")]
    SuperadminImmutable,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token signing error.
    #[error("token signing error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl AuthError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields
            | Self::InvalidEmail(_)
            | Self::EmailInUse
            | Self::CorporateEmailRequired(_)
            | Self::CorporateEmailReserved
            | Self::SuperadminExists
            | Self::InvalidCredentials
            | Self::NothingToUpdate
            | Self::NoChanges => StatusCode::BAD_REQUEST,
            Self::ProfileNotFound | Self::AdminNotFound => StatusCode::NOT_FOUND,
            Self::SuperadminImmutable => StatusCode::FORBIDDEN,
            Self::Repository(err) => repository_status(err),
            Self::PasswordHash | Self::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::MissingFields => "Todos los campos son requeridos".to_string(),
            Self::InvalidEmail(_) => "Correo inválido".to_string(),
            Self::EmailInUse => "El correo ya está en uso".to_string(),
            Self::CorporateEmailRequired(domain) => {
                format!("El correo debe ser corporativo @{domain}")
            }
            Self::CorporateEmailReserved => {
                "Los clientes no pueden usar correos corporativos".to_string()
            }
            Self::SuperadminExists => {
                "Superadmin ya existe. Usa /api/auth/iniciar-sesion".to_string()
            }
            Self::InvalidCredentials => "Credenciales inválidas".to_string(),
            Self::NothingToUpdate => {
                "Al menos un campo debe ser proporcionado para actualizar".to_string()
            }
            Self::NoChanges => "No hay cambios válidos para actualizar".to_string(),
            Self::ProfileNotFound => "Perfil no encontrado".to_string(),
            Self::AdminNotFound => "Admin no encontrado".to_string(),
            Self::SuperadminImmutable => "No se puede modificar el superadmin".to_string(),
            Self::Repository(err) => repository_message(err),
            Self::PasswordHash => "Error: no se pudo procesar la contraseña".to_string(),
            Self::Token(err) => format!("Error: {err}"),
        }
    }
}

/// Errors produced while authorizing a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// No bearer token was supplied.
    #[error("no token")]
    MissingToken,

    /// Bad signature, malformed token, or expired token.
    #[error("invalid token")]
    InvalidToken,

    /// Valid token whose role is not in the required set.
    #[error("forbidden")]
    Forbidden(RoleSet),
}

impl AccessError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingToken => StatusCode::UNAUTHORIZED,
            Self::InvalidToken | Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    /// Client-facing message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::MissingToken => "No token proporcionado".to_string(),
            Self::InvalidToken => "Token inválido".to_string(),
            Self::Forbidden(required) if *required == RoleSet::SUPERADMIN => {
                "Acceso denegado: solo superadministradores".to_string()
            }
            Self::Forbidden(required) if *required == RoleSet::STAFF => {
                "Acceso denegado: solo administradores o superadmin".to_string()
            }
            Self::Forbidden(_) => "Acceso denegado".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_violations_are_bad_requests() {
        assert_eq!(AuthError::CorporateEmailReserved.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AuthError::CorporateEmailRequired("srrobot.com".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::SuperadminExists.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::EmailInUse.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_superadmin_edit_is_forbidden() {
        assert_eq!(AuthError::SuperadminImmutable.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_corporate_message_names_domain() {
        let msg = AuthError::CorporateEmailRequired("srrobot.com".to_string()).message();
        assert_eq!(msg, "El correo debe ser corporativo @srrobot.com");
    }

    #[test]
    fn test_access_error_messages() {
        assert_eq!(AccessError::MissingToken.message(), "No token proporcionado");
        assert_eq!(AccessError::InvalidToken.message(), "Token inválido");
        assert_eq!(
            AccessError::Forbidden(RoleSet::STAFF).message(),
            "Acceso denegado: solo administradores o superadmin"
        );
        assert_eq!(
            AccessError::Forbidden(RoleSet::SUPERADMIN).message(),
            "Acceso denegado: solo superadministradores"
        );
    }
}
