//! Named counters backing sequential IDs.
//!
//! Every counter is a single row in `shop.counter`. Allocation is one atomic
//! upsert statement, so concurrent writers never observe the same value.
//! Record creation allocates through [`next_in`] on the same transaction as
//! the insert, which keeps each counter gapless when an insert fails.

use sqlx::{PgExecutor, PgPool};
use tracing::instrument;

use srrobot_core::Sequence;

use super::RepositoryError;

const ALLOCATE_SQL: &str = r"
    INSERT INTO shop.counter (name, value)
    VALUES ($1, 1)
    ON CONFLICT (name) DO UPDATE SET value = shop.counter.value + 1
    RETURNING value
";

/// Allocate the next value of `sequence` on any executor (pool or transaction).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the statement fails.
pub async fn next_in<'e, E>(executor: E, sequence: Sequence) -> Result<i64, RepositoryError>
where
    E: PgExecutor<'e>,
{
    let value: i64 = sqlx::query_scalar(ALLOCATE_SQL)
        .bind(sequence.name())
        .fetch_one(executor)
        .await?;
    Ok(value)
}

/// Standalone allocator over the connection pool.
pub struct SequenceAllocator<'a> {
    pool: &'a PgPool,
}

impl<'a> SequenceAllocator<'a> {
    /// Create a new allocator.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Allocate the next value of `sequence`.
    ///
    /// The first allocation of a counter returns 1.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store is unreachable.
    #[instrument(skip(self), fields(counter = sequence.name()))]
    pub async fn next(&self, sequence: Sequence) -> Result<i64, RepositoryError> {
        next_in(self.pool, sequence).await
    }

    /// Current value of `sequence` without advancing it (0 if never used).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn current(&self, sequence: Sequence) -> Result<i64, RepositoryError> {
        let value: Option<i64> =
            sqlx::query_scalar("SELECT value FROM shop.counter WHERE name = $1")
                .bind(sequence.name())
                .fetch_optional(self.pool)
                .await?;
        Ok(value.unwrap_or(0))
    }
}
