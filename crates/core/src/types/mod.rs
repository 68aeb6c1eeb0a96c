//! Core types for the SrRobot shop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod role;
pub mod sequence;

pub use email::{Email, EmailError};
pub use id::*;
pub use role::{Role, RoleParseError, RoleSet};
pub use sequence::Sequence;
