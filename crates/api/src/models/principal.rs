//! Principal domain types.
//!
//! A principal is any identity that can log in: a customer (`user`), an
//! `admin`, or the single `superadmin`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use srrobot_core::{Email, PrincipalId, PrincipalNumber, Role};

/// A stored principal (domain type). Never carries the password hash.
#[derive(Debug, Clone)]
pub struct Principal {
    /// Internal row ID, used as the token subject.
    pub id: PrincipalId,
    /// Sequential public number (`clienteId` for customers, `usuarioId` for staff).
    pub number: PrincipalNumber,
    /// Full display name.
    pub full_name: String,
    /// Login email, unique across all principals.
    pub email: Email,
    /// Role tag.
    pub role: Role,
    /// When the principal was created.
    pub created_at: DateTime<Utc>,
    /// When the principal was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Public JSON view of a principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalView {
    #[serde(rename = "id_usuario")]
    pub number: PrincipalNumber,
    #[serde(rename = "nombreCompleto")]
    pub full_name: String,
    #[serde(rename = "correo")]
    pub email: Email,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "fecha")]
    pub created_at: DateTime<Utc>,
}

impl From<&Principal> for PrincipalView {
    fn from(principal: &Principal) -> Self {
        Self {
            number: principal.number,
            full_name: principal.full_name.clone(),
            email: principal.email.clone(),
            role: principal.role,
            created_at: principal.created_at,
        }
    }
}

impl From<Principal> for PrincipalView {
    fn from(principal: Principal) -> Self {
        Self {
            number: principal.number,
            full_name: principal.full_name,
            email: principal.email,
            role: principal.role,
            created_at: principal.created_at,
        }
    }
}

/// Registration / admin creation / bootstrap request body.
///
/// Fields are optional so that a missing field is reported as a validation
/// error rather than a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsInput {
    #[serde(rename = "nombreCompleto")]
    pub full_name: Option<String>,
    #[serde(rename = "correo")]
    pub email: Option<String>,
    #[serde(rename = "contrasena")]
    pub password: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
    #[serde(rename = "correo")]
    pub email: Option<String>,
    #[serde(rename = "contrasena")]
    pub password: Option<String>,
}

/// Profile or admin update request body. Every field is optional.
pub type ProfileInput = CredentialsInput;

/// Validated changes to apply to a principal.
///
/// `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct PrincipalPatch {
    pub full_name: Option<String>,
    pub email: Option<Email>,
    pub password_hash: Option<String>,
}

impl PrincipalPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Principal {
        Principal {
            id: PrincipalId::new(10),
            number: PrincipalNumber::new(3),
            full_name: "Ana Torres".to_string(),
            email: Email::parse("ana@example.com").unwrap(),
            role: Role::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_view_uses_wire_names() {
        let json = serde_json::to_value(PrincipalView::from(&sample())).unwrap();
        assert_eq!(json["id_usuario"], 3);
        assert_eq!(json["nombreCompleto"], "Ana Torres");
        assert_eq!(json["correo"], "ana@example.com");
        assert_eq!(json["rol"], "user");
        assert!(json.get("fecha").is_some());
        assert!(json.get("password_hash").is_none());
        assert!(json.get("contrasena").is_none());
    }

    #[test]
    fn test_credentials_input_accepts_partial_body() {
        let input: CredentialsInput =
            serde_json::from_str(r#"{"correo":"ana@example.com"}"#).unwrap();
        assert_eq!(input.email.as_deref(), Some("ana@example.com"));
        assert!(input.full_name.is_none());
        assert!(input.password.is_none());
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(PrincipalPatch::default().is_empty());
        let patch = PrincipalPatch {
            full_name: Some("x".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
