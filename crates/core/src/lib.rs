//! SrRobot Core - Shared types library.
//!
//! This crate provides common types used across all SrRobot shop components:
//! - `api` - HTTP/JSON backend with the real-time channel
//! - `cli` - Command-line tools for migrations and bootstrap
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Typed sequential IDs, emails, roles and counter names

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
