//! Catalog error types.

use axum::http::StatusCode;
use thiserror::Error;

use super::validation::ProductValidationError;
use crate::db::RepositoryError;
use crate::error::{repository_message, repository_status};

/// Errors that can occur during category and product operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Category name missing or blank.
    #[error("category name required")]
    CategoryNameRequired,

    /// A category with this name already exists.
    #[error("category already exists")]
    CategoryExists,

    /// Renaming would collide with another category.
    #[error("category name in use")]
    CategoryNameInUse,

    /// No category with the requested ID.
    #[error("category not found")]
    CategoryNotFound,

    /// Products still reference the category.
    #[error("category {name:?} is used by {count} products")]
    CategoryInUse { name: String, count: i64 },

    /// Update request carried no fields.
    #[error("no fields to update")]
    NothingToUpdate,

    /// Update request did not differ from the stored record.
    #[error("no changes to apply")]
    NoChanges,

    /// Product payload failed validation.
    #[error("invalid product: {0}")]
    InvalidProduct(#[from] ProductValidationError),

    /// Product references a category that does not exist.
    #[error("unknown category {0:?}")]
    UnknownCategory(String),

    /// No product with the requested ID.
    #[error("product not found")]
    ProductNotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl CatalogError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::CategoryNameRequired
            | Self::CategoryExists
            | Self::CategoryNameInUse
            | Self::CategoryInUse { .. }
            | Self::NothingToUpdate
            | Self::NoChanges
            | Self::InvalidProduct(_)
            | Self::UnknownCategory(_) => StatusCode::BAD_REQUEST,
            Self::CategoryNotFound | Self::ProductNotFound => StatusCode::NOT_FOUND,
            Self::Repository(err) => repository_status(err),
        }
    }

    /// Client-facing message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::CategoryNameRequired => "El nombre de la categoría es requerido".to_string(),
            Self::CategoryExists => "Categoría ya existe".to_string(),
            Self::CategoryNameInUse => "El nombre de categoría ya está en uso".to_string(),
            Self::CategoryNotFound => "Categoría no encontrada".to_string(),
            Self::CategoryInUse { name, count } => format!(
                "No se puede eliminar la categoría \"{name}\" porque está en uso por {count} productos"
            ),
            Self::NothingToUpdate => {
                "Al menos un campo debe ser proporcionado para actualizar".to_string()
            }
            Self::NoChanges => "No hay cambios válidos para actualizar".to_string(),
            Self::InvalidProduct(err) => err.to_string(),
            Self::UnknownCategory(name) => format!("La categoría \"{name}\" no existe"),
            Self::ProductNotFound => "Producto no encontrado".to_string(),
            Self::Repository(err) => repository_message(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_in_use_message_includes_count() {
        let err = CatalogError::CategoryInUse {
            name: "Gaming".to_string(),
            count: 3,
        };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.message(),
            "No se puede eliminar la categoría \"Gaming\" porque está en uso por 3 productos"
        );
    }

    #[test]
    fn test_validation_errors_are_bad_requests() {
        let err = CatalogError::from(ProductValidationError::InvalidPrice);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "El precio debe ser un número entre 0.01 y 10000");

        let err = CatalogError::UnknownCategory("Audio".to_string());
        assert_eq!(err.message(), "La categoría \"Audio\" no existe");
    }

    #[test]
    fn test_not_found_statuses() {
        assert_eq!(CatalogError::ProductNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(CatalogError::CategoryNotFound.status(), StatusCode::NOT_FOUND);
    }
}
