//! Authentication service.
//!
//! Registration, login, profile management and admin management for every
//! kind of principal. Route-level role gating lives in
//! [`crate::middleware::auth`]; the email-domain rules live in [`AccessPolicy`].

mod error;
pub mod password;
pub mod policy;
pub mod token;

pub use error::{AccessError, AuthError};
pub use policy::AccessPolicy;
pub use token::{Claims, CurrentPrincipal, TokenSigner, authorize};

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use srrobot_core::{Email, PrincipalNumber, Role};

use crate::db::RepositoryError;
use crate::db::principals::{PrincipalRepository, SUPERADMIN_CONFLICT};
use crate::models::{CredentialsInput, Principal, PrincipalPatch, ProfileInput};

/// Trimmed, non-empty value of an optional text field.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Authentication service.
///
/// Handles registration, login, profile updates and admin management.
pub struct AuthService<'a> {
    principals: PrincipalRepository<'a>,
    policy: &'a AccessPolicy,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, policy: &'a AccessPolicy) -> Self {
        Self {
            principals: PrincipalRepository::new(pool),
            policy,
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a customer (`user` role).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` if any field is blank.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::CorporateEmailReserved` for a corporate email.
    /// Returns `AuthError::EmailInUse` if the email is already registered.
    pub async fn register_customer(&self, input: &CredentialsInput) -> Result<Principal, AuthError> {
        self.register(input, Role::User).await
    }

    /// Create an admin. Callers must already be authorized as superadmin.
    ///
    /// # Errors
    ///
    /// Same as [`Self::register_customer`], with `CorporateEmailRequired` for a
    /// non-corporate email.
    pub async fn create_admin(&self, input: &CredentialsInput) -> Result<Principal, AuthError> {
        self.register(input, Role::Admin).await
    }

    /// Create the one and only superadmin.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SuperadminExists` if a superadmin was already
    /// created, including when a concurrent bootstrap wins the race.
    /// Otherwise the same as [`Self::create_admin`].
    pub async fn bootstrap_superadmin(
        &self,
        input: &CredentialsInput,
    ) -> Result<Principal, AuthError> {
        self.register(input, Role::Superadmin).await
    }

    #[instrument(skip(self, input))]
    async fn register(&self, input: &CredentialsInput, role: Role) -> Result<Principal, AuthError> {
        let (Some(full_name), Some(email), Some(password)) = (
            present(input.full_name.as_deref()),
            present(input.email.as_deref()),
            input.password.as_deref().filter(|p| !p.is_empty()),
        ) else {
            return Err(AuthError::MissingFields);
        };

        let email = Email::parse(email)?;
        self.policy.check_email(&email, role)?;

        if role == Role::Superadmin && self.principals.superadmin_exists().await? {
            return Err(AuthError::SuperadminExists);
        }

        if self.principals.email_taken(&email, None).await? {
            return Err(AuthError::EmailInUse);
        }

        let password_hash = password::hash_password(password)?;

        let principal = self
            .principals
            .create(full_name, &email, &password_hash, role)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(msg) if msg == SUPERADMIN_CONFLICT => {
                    AuthError::SuperadminExists
                }
                RepositoryError::Conflict(_) => AuthError::EmailInUse,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(
            number = %principal.number,
            role = %principal.role,
            "Principal registered"
        );

        Ok(principal)
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Check credentials and issue a token valid for one hour from `now`.
    ///
    /// Unknown emails run a throwaway hash verification so both failure paths
    /// cost the same.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[instrument(skip(self, password, signer))]
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
        signer: &TokenSigner,
        now: DateTime<Utc>,
    ) -> Result<(String, Role), AuthError> {
        let Ok(email) = Email::parse(email.trim()) else {
            return Err(password::verify_dummy(password));
        };

        let Some((principal, password_hash)) = self.principals.get_credentials(&email).await?
        else {
            return Err(password::verify_dummy(password));
        };

        password::verify_password(password, &password_hash)?;

        let token = signer.issue(principal.id, principal.role, now)?;
        tracing::info!(principal_id = %principal.id, role = %principal.role, "Login succeeded");

        Ok((token, principal.role))
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Get the caller's own profile.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ProfileNotFound` if the principal no longer exists.
    pub async fn profile(&self, current: &CurrentPrincipal) -> Result<Principal, AuthError> {
        self.principals
            .get_by_id(current.id)
            .await?
            .ok_or(AuthError::ProfileNotFound)
    }

    /// Update the caller's own name, email or password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NothingToUpdate` if no field was supplied.
    /// Returns `AuthError::ProfileNotFound` if the principal no longer exists.
    /// Returns `AuthError::SuperadminImmutable` when called by the superadmin.
    /// Returns `AuthError::EmailInUse` or a policy error for a bad new email.
    /// Returns `AuthError::NoChanges` if nothing differs.
    #[instrument(skip(self, current, input), fields(principal_id = %current.id))]
    pub async fn update_profile(
        &self,
        current: &CurrentPrincipal,
        input: &ProfileInput,
    ) -> Result<Principal, AuthError> {
        ensure_any_field(input)?;

        let existing = self.profile(current).await?;
        if existing.role == Role::Superadmin {
            return Err(AuthError::SuperadminImmutable);
        }

        let patch = self.build_patch(&existing, input).await?;
        self.principals
            .update(existing.id, &patch)
            .await
            .map_err(map_update_conflict)?
            .ok_or(AuthError::ProfileNotFound)
    }

    // =========================================================================
    // Admin Management
    // =========================================================================

    /// List all admins (the superadmin is not included).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the query fails.
    pub async fn list_admins(&self) -> Result<Vec<Principal>, AuthError> {
        Ok(self.principals.list_by_role(Role::Admin).await?)
    }

    /// Get an admin by number.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AdminNotFound` if no admin has this number.
    pub async fn get_admin(&self, number: PrincipalNumber) -> Result<Principal, AuthError> {
        self.principals
            .get_by_number(Role::Admin, number)
            .await?
            .ok_or(AuthError::AdminNotFound)
    }

    /// Update an admin. The email must stay corporate.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NothingToUpdate` if no field was supplied.
    /// Returns `AuthError::SuperadminImmutable` if `number` is the superadmin.
    /// Returns `AuthError::AdminNotFound` if no admin has this number.
    /// Otherwise the same as [`Self::update_profile`].
    #[instrument(skip(self, input))]
    pub async fn update_admin(
        &self,
        number: PrincipalNumber,
        input: &ProfileInput,
    ) -> Result<Principal, AuthError> {
        ensure_any_field(input)?;

        let existing = self.managed_admin(number).await?;
        let patch = self.build_patch(&existing, input).await?;

        self.principals
            .update(existing.id, &patch)
            .await
            .map_err(map_update_conflict)?
            .ok_or(AuthError::AdminNotFound)
    }

    /// Delete an admin.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SuperadminImmutable` if `number` is the superadmin.
    /// Returns `AuthError::AdminNotFound` if no admin has this number.
    #[instrument(skip(self))]
    pub async fn delete_admin(&self, number: PrincipalNumber) -> Result<(), AuthError> {
        let existing = self.managed_admin(number).await?;

        self.principals
            .delete(existing.id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::AdminNotFound,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(number = %number, "Admin deleted");
        Ok(())
    }

    /// Resolve a staff number to an admin the superadmin may manage.
    async fn managed_admin(&self, number: PrincipalNumber) -> Result<Principal, AuthError> {
        if let Some(admin) = self.principals.get_by_number(Role::Admin, number).await? {
            return Ok(admin);
        }

        if self
            .principals
            .get_by_number(Role::Superadmin, number)
            .await?
            .is_some()
        {
            return Err(AuthError::SuperadminImmutable);
        }

        Err(AuthError::AdminNotFound)
    }

    /// Turn an update request into the set of fields that actually change.
    async fn build_patch(
        &self,
        existing: &Principal,
        input: &ProfileInput,
    ) -> Result<PrincipalPatch, AuthError> {
        let mut patch = PrincipalPatch::default();

        if let Some(full_name) = present(input.full_name.as_deref())
            && full_name != existing.full_name
        {
            patch.full_name = Some(full_name.to_owned());
        }

        if let Some(email) = present(input.email.as_deref()).map(Email::parse).transpose()?
            && email != existing.email
        {
            if self.principals.email_taken(&email, Some(existing.id)).await? {
                return Err(AuthError::EmailInUse);
            }
            self.policy.check_email(&email, existing.role)?;
            patch.email = Some(email);
        }

        // A supplied password always counts as a change.
        if let Some(password) = input.password.as_deref().filter(|p| !p.is_empty()) {
            patch.password_hash = Some(password::hash_password(password)?);
        }

        if patch.is_empty() {
            return Err(AuthError::NoChanges);
        }

        Ok(patch)
    }
}

fn ensure_any_field(input: &ProfileInput) -> Result<(), AuthError> {
    let has_any = present(input.full_name.as_deref()).is_some()
        || present(input.email.as_deref()).is_some()
        || input.password.as_deref().is_some_and(|p| !p.is_empty());

    if has_any {
        Ok(())
    } else {
        Err(AuthError::NothingToUpdate)
    }
}

fn map_update_conflict(err: RepositoryError) -> AuthError {
    match err {
        RepositoryError::Conflict(_) => AuthError::EmailInUse,
        other => AuthError::Repository(other),
    }
}
