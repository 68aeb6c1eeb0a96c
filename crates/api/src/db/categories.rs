//! Category repository for database operations.

use sqlx::PgPool;
use tracing::instrument;

use srrobot_core::{CategoryId, Sequence};

use super::{RepositoryError, counters};
use crate::models::Category;

/// Conflict message when a category name is already used.
pub const NAME_CONFLICT: &str = "category name already exists";

/// Internal row type for `PostgreSQL` category queries.
#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    sequential_id: i64,
    name: String,
    description: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.sequential_id),
            name: row.name,
            description: row.description,
        }
    }
}

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows: Vec<CategoryRow> = sqlx::query_as(
            "SELECT sequential_id, name, description FROM shop.category ORDER BY sequential_id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let row: Option<CategoryRow> = sqlx::query_as(
            "SELECT sequential_id, name, description FROM shop.category WHERE sequential_id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Whether a category with exactly this name exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists_by_name(&self, name: &str) -> Result<bool, RepositoryError> {
        self.name_taken(name, None).await
    }

    /// Whether `name` is used by any category other than `except`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn name_taken(
        &self,
        name: &str,
        except: Option<CategoryId>,
    ) -> Result<bool, RepositoryError> {
        let taken: bool = sqlx::query_scalar(
            r"
            SELECT EXISTS(
                SELECT 1 FROM shop.category
                WHERE name = $1 AND ($2::BIGINT IS NULL OR sequential_id <> $2)
            )
            ",
        )
        .bind(name)
        .bind(except)
        .fetch_one(self.pool)
        .await?;

        Ok(taken)
    }

    /// Create a category with the next `categoriaId`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is already used.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, description))]
    pub async fn create(&self, name: &str, description: &str) -> Result<Category, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let id = counters::next_in(&mut *tx, Sequence::Category).await?;

        let row: CategoryRow = sqlx::query_as(
            r"
            INSERT INTO shop.category (sequential_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING sequential_id, name, description
            ",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_unique(e, NAME_CONFLICT))?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Update a category. `None` fields keep their current value.
    ///
    /// Returns `None` if the category does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the new name is already used.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, description), fields(category_id = %id))]
    pub async fn update(
        &self,
        id: CategoryId,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<Category>, RepositoryError> {
        let row: Option<CategoryRow> = sqlx::query_as(
            r"
            UPDATE shop.category
            SET name = COALESCE($2, name),
                description = COALESCE($3, description)
            WHERE sequential_id = $1
            RETURNING sequential_id, name, description
            ",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique(e, NAME_CONFLICT))?;

        Ok(row.map(Into::into))
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.category WHERE sequential_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
