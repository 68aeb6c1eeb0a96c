//! Catalog service: categories and products.
//!
//! Products reference their category by name. Creating a product publishes a
//! `productCreated` event on the [`EventBus`].

mod error;
pub mod validation;

pub use error::CatalogError;
pub use validation::ProductValidationError;

use sqlx::PgPool;
use tracing::instrument;

use srrobot_core::{CategoryId, ProductId};

use crate::db::categories::{CategoryRepository, NAME_CONFLICT};
use crate::db::{ProductRepository, RepositoryError};
use crate::events::{EventBus, ServerEvent};
use crate::models::{Category, CategoryInput, Product, ProductDraft, ProductInput};

/// Trimmed, non-empty value of an optional text field.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Catalog service.
pub struct CatalogService<'a> {
    categories: CategoryRepository<'a>,
    products: ProductRepository<'a>,
    events: &'a EventBus,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, events: &'a EventBus) -> Self {
        Self {
            categories: CategoryRepository::new(pool),
            products: ProductRepository::new(pool),
            events,
        }
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.categories.list().await?)
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CategoryNameRequired` if the name is blank.
    /// Returns `CatalogError::CategoryExists` on an exact name collision.
    #[instrument(skip(self, input))]
    pub async fn create_category(&self, input: &CategoryInput) -> Result<Category, CatalogError> {
        let name = present(input.name.as_deref()).ok_or(CatalogError::CategoryNameRequired)?;
        let description = input.description.as_deref().map_or("", str::trim);

        if self.categories.exists_by_name(name).await? {
            return Err(CatalogError::CategoryExists);
        }

        let category = self
            .categories
            .create(name, description)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => CatalogError::CategoryExists,
                other => CatalogError::Repository(other),
            })?;

        tracing::info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// Update a category's name and/or description.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NothingToUpdate` when neither field is supplied.
    /// Returns `CatalogError::CategoryNotFound` if the category does not exist.
    /// Returns `CatalogError::CategoryNameInUse` if another category has the name.
    /// Returns `CatalogError::NoChanges` if nothing differs.
    #[instrument(skip(self, input))]
    pub async fn update_category(
        &self,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, CatalogError> {
        let name = present(input.name.as_deref());
        let has_description = input.description.as_deref().is_some_and(|d| !d.is_empty());
        if name.is_none() && !has_description {
            return Err(CatalogError::NothingToUpdate);
        }

        let existing = self
            .categories
            .get(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound)?;

        let new_name = match name {
            Some(name) if name != existing.name => {
                if self.categories.name_taken(name, Some(id)).await? {
                    return Err(CatalogError::CategoryNameInUse);
                }
                Some(name)
            }
            _ => None,
        };

        let new_description = input
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| *d != existing.description);

        if new_name.is_none() && new_description.is_none() {
            return Err(CatalogError::NoChanges);
        }

        self.categories
            .update(id, new_name, new_description)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(msg) if msg == NAME_CONFLICT => {
                    CatalogError::CategoryNameInUse
                }
                other => CatalogError::Repository(other),
            })?
            .ok_or(CatalogError::CategoryNotFound)
    }

    /// Delete a category that no product references.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CategoryNotFound` if the category does not exist.
    /// Returns `CatalogError::CategoryInUse` if products still reference it.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), CatalogError> {
        let category = self
            .categories
            .get(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound)?;

        let count = self.products.count_by_category(&category.name).await?;
        if count > 0 {
            return Err(CatalogError::CategoryInUse {
                name: category.name,
                count,
            });
        }

        self.categories.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => CatalogError::CategoryNotFound,
            other => CatalogError::Repository(other),
        })?;

        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list().await?)
    }

    /// Get one product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if the product does not exist.
    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products
            .get(id)
            .await?
            .ok_or(CatalogError::ProductNotFound)
    }

    /// Validate, persist and announce a new product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidProduct` for the first failing field check.
    /// Returns `CatalogError::UnknownCategory` if the category does not exist.
    #[instrument(skip(self, input))]
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, CatalogError> {
        let draft = self.validate(input).await?;

        let product = self.products.create(&draft).await?;

        tracing::info!(product_id = %product.id, category = %product.category, "Product created");
        self.events
            .publish(ServerEvent::ProductCreated(product.clone()));

        Ok(product)
    }

    /// Replace a product's editable fields.
    ///
    /// # Errors
    ///
    /// Same validation errors as [`Self::create_product`], then
    /// `CatalogError::ProductNotFound` if the product does not exist.
    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, CatalogError> {
        let draft = self.validate(input).await?;

        self.products
            .replace(id, &draft)
            .await?
            .ok_or(CatalogError::ProductNotFound)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if the product does not exist.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), CatalogError> {
        self.products.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => CatalogError::ProductNotFound,
            other => CatalogError::Repository(other),
        })?;

        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// Field checks followed by the category lookup.
    async fn validate(&self, input: &ProductInput) -> Result<ProductDraft, CatalogError> {
        let draft = validation::validate(input)?;

        if !self.categories.exists_by_name(&draft.category).await? {
            return Err(CatalogError::UnknownCategory(draft.category));
        }

        Ok(draft)
    }
}
