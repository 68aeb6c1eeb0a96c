//! Domain models for the shop API.
//!
//! Domain types are validated objects separate from database row types. Their
//! serde representation is the JSON wire format consumed by the front end.

pub mod catalog;
pub mod principal;

pub use catalog::{Category, CategoryInput, Product, ProductDraft, ProductInput};
pub use principal::{
    CredentialsInput, LoginInput, Principal, PrincipalPatch, PrincipalView, ProfileInput,
};
