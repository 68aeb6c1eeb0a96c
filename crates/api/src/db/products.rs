//! Product repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use srrobot_core::{ProductId, Sequence};

use super::{RepositoryError, counters};
use crate::models::{Product, ProductDraft};

const COLUMNS: &str = "sequential_id, category_name, name, price, original_price, \
    discount_percent, image_url, description, spec_text, product_code, rating, \
    review_count, in_stock, featured, created_at";

/// Internal row type for `PostgreSQL` product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    sequential_id: i64,
    category_name: String,
    name: String,
    price: Decimal,
    original_price: Option<Decimal>,
    discount_percent: Option<Decimal>,
    image_url: String,
    description: String,
    spec_text: String,
    product_code: String,
    rating: Decimal,
    review_count: i32,
    in_stock: bool,
    featured: bool,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.sequential_id),
            category: row.category_name,
            name: row.name,
            price: row.price,
            original_price: row.original_price,
            discount_percent: row.discount_percent,
            image_url: row.image_url,
            description: row.description,
            spec_text: row.spec_text,
            product_code: row.product_code,
            rating: row.rating,
            review_count: row.review_count,
            in_stock: row.in_stock,
            featured: row.featured,
            created_at: row.created_at,
        }
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM shop.product ORDER BY sequential_id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM shop.product WHERE sequential_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Number of products referencing the category `name`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_category(&self, name: &str) -> Result<i64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM shop.product WHERE category_name = $1")
                .bind(name)
                .fetch_one(self.pool)
                .await?;

        Ok(count)
    }

    /// Persist a validated product with the next `productoId`.
    ///
    /// Rating, review count and featured flag start at their column defaults.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, draft), fields(name = %draft.name, category = %draft.category))]
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let id = counters::next_in(&mut *tx, Sequence::Product).await?;

        let row: ProductRow = sqlx::query_as(&format!(
            r"
            INSERT INTO shop.product (
                sequential_id, category_name, name, price, original_price,
                discount_percent, image_url, description, spec_text, product_code, in_stock
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(&draft.category)
        .bind(&draft.name)
        .bind(draft.price)
        .bind(draft.original_price)
        .bind(draft.discount_percent)
        .bind(&draft.image_url)
        .bind(&draft.description)
        .bind(&draft.spec_text)
        .bind(&draft.product_code)
        .bind(draft.in_stock)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Replace the editable fields of a product.
    ///
    /// Rating, review count, featured flag and creation time are preserved.
    /// Returns `None` if the product does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    #[instrument(skip(self, draft), fields(product_id = %id))]
    pub async fn replace(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            r"
            UPDATE shop.product
            SET category_name = $2,
                name = $3,
                price = $4,
                original_price = $5,
                discount_percent = $6,
                image_url = $7,
                description = $8,
                spec_text = $9,
                product_code = $10,
                in_stock = $11
            WHERE sequential_id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(&draft.category)
        .bind(&draft.name)
        .bind(draft.price)
        .bind(draft.original_price)
        .bind(draft.discount_percent)
        .bind(&draft.image_url)
        .bind(&draft.description)
        .bind(&draft.spec_text)
        .bind(&draft.product_code)
        .bind(draft.in_stock)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.product WHERE sequential_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
