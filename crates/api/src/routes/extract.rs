//! Body and path extractors that reject with [`AppError`].
//!
//! Axum's own `Json` and `Path` reject with plain-text bodies; these wrappers
//! turn the rejection into a 400 with the usual `{ "mensaje": ... }` shape.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Typed path parameter, e.g. a numeric ID.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct IdPath<T>(pub T);
