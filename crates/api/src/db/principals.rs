//! Principal repository: customers, admins and the superadmin.
//!
//! All principals live in `shop.principal`, tagged by role. Sequential numbers
//! are allocated inside the insert transaction from the counter that matches
//! the role (`clienteId` for customers, `usuarioId` for staff).

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use srrobot_core::{Email, PrincipalId, PrincipalNumber, Role, Sequence};

use super::{RepositoryError, counters};
use crate::models::{Principal, PrincipalPatch};

/// Conflict message when the email is already registered.
pub const EMAIL_CONFLICT: &str = "email already exists";
/// Conflict message when a second superadmin is inserted.
pub const SUPERADMIN_CONFLICT: &str = "superadmin already exists";

const SUPERADMIN_INDEX: &str = "principal_single_superadmin";

const COLUMNS: &str = "id, sequential_id, full_name, email, role, created_at, updated_at";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` principal queries.
#[derive(Debug, sqlx::FromRow)]
struct PrincipalRow {
    id: i64,
    sequential_id: i64,
    full_name: String,
    email: String,
    role: Role,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PrincipalRow> for Principal {
    type Error = RepositoryError;

    fn try_from(row: PrincipalRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: PrincipalId::new(row.id),
            number: PrincipalNumber::new(row.sequential_id),
            full_name: row.full_name,
            email,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Principal row joined with its password hash, for login only.
#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    principal: PrincipalRow,
    password_hash: String,
}

/// Counter that numbers principals of `role`.
#[must_use]
pub const fn sequence_for(role: Role) -> Sequence {
    match role {
        Role::User => Sequence::Customer,
        Role::Admin | Role::Superadmin => Sequence::Staff,
    }
}

fn map_insert_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        if db_err.constraint() == Some(SUPERADMIN_INDEX) {
            return RepositoryError::Conflict(SUPERADMIN_CONFLICT.to_owned());
        }
        return RepositoryError::Conflict(EMAIL_CONFLICT.to_owned());
    }
    RepositoryError::Database(err)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for principal database operations.
pub struct PrincipalRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PrincipalRepository<'a> {
    /// Create a new principal repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a principal, numbering it from the counter for its role.
    ///
    /// The number is allocated in the same transaction as the insert, so a
    /// rejected insert leaves the counter untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` with [`EMAIL_CONFLICT`] if the email
    /// already exists, or [`SUPERADMIN_CONFLICT`] if a superadmin already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, password_hash), fields(email = %email, role = %role))]
    pub async fn create(
        &self,
        full_name: &str,
        email: &Email,
        password_hash: &str,
        role: Role,
    ) -> Result<Principal, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let number = counters::next_in(&mut *tx, sequence_for(role)).await?;

        let row: PrincipalRow = sqlx::query_as(&format!(
            r"
            INSERT INTO shop.principal (sequential_id, full_name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "
        ))
        .bind(number)
        .bind(full_name)
        .bind(email.as_str())
        .bind(password_hash)
        .bind(role)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        tx.commit().await?;

        row.try_into()
    }

    /// Get a principal by internal ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_id(&self, id: PrincipalId) -> Result<Option<Principal>, RepositoryError> {
        let row: Option<PrincipalRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM shop.principal WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a principal and its password hash by email, in a single lookup.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(Principal, String)>, RepositoryError> {
        let row: Option<CredentialRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS}, password_hash FROM shop.principal WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| Ok((r.principal.try_into()?, r.password_hash)))
            .transpose()
    }

    /// Get a principal of `role` by its sequential number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_number(
        &self,
        role: Role,
        number: PrincipalNumber,
    ) -> Result<Option<Principal>, RepositoryError> {
        let row: Option<PrincipalRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM shop.principal WHERE role = $1 AND sequential_id = $2"
        ))
        .bind(role)
        .bind(number)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// List all principals with `role`, ordered by sequential number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list_by_role(&self, role: Role) -> Result<Vec<Principal>, RepositoryError> {
        let rows: Vec<PrincipalRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM shop.principal WHERE role = $1 ORDER BY sequential_id"
        ))
        .bind(role)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Whether `email` belongs to any principal other than `except`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn email_taken(
        &self,
        email: &Email,
        except: Option<PrincipalId>,
    ) -> Result<bool, RepositoryError> {
        let taken: bool = sqlx::query_scalar(
            r"
            SELECT EXISTS(
                SELECT 1 FROM shop.principal
                WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            )
            ",
        )
        .bind(email.as_str())
        .bind(except)
        .fetch_one(self.pool)
        .await?;

        Ok(taken)
    }

    /// Whether the superadmin has been created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn superadmin_exists(&self) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM shop.principal WHERE role = 'superadmin')",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Apply `patch` to a principal. Unset fields keep their current value.
    ///
    /// Returns `None` if the principal no longer exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the new email is already in use.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, patch), fields(principal_id = %id))]
    pub async fn update(
        &self,
        id: PrincipalId,
        patch: &PrincipalPatch,
    ) -> Result<Option<Principal>, RepositoryError> {
        let row: Option<PrincipalRow> = sqlx::query_as(&format!(
            r"
            UPDATE shop.principal
            SET full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(patch.full_name.as_deref())
        .bind(patch.email.as_ref().map(Email::as_str))
        .bind(patch.password_hash.as_deref())
        .fetch_optional(self.pool)
        .await
        .map_err(map_insert_error)?;

        row.map(TryInto::try_into).transpose()
    }

    /// Delete a principal.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the principal does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(principal_id = %id))]
    pub async fn delete(&self, id: PrincipalId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.principal WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customers_and_staff_use_separate_counters() {
        assert_eq!(sequence_for(Role::User), Sequence::Customer);
        assert_eq!(sequence_for(Role::Admin), Sequence::Staff);
        assert_eq!(sequence_for(Role::Superadmin), Sequence::Staff);
    }
}
