//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Registration, login, profiles, admin management, token checks
//! - `catalog` - Categories and products, with `productCreated` announcements
//!
//! Services borrow the pool and shared state for the duration of one request
//! and return their own error enums, which convert into `AppError`.

pub mod auth;
pub mod catalog;

pub use auth::AuthService;
pub use catalog::CatalogService;
