//! HTTP middleware stack for the API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. CORS
//! 3. `TraceLayer` (request span with an empty `request_id` field)
//! 4. Request ID (fills the span field, tags Sentry, echoes the header)
//!
//! Role checks are extractors rather than layers, see [`auth`].

pub mod auth;
pub mod request_id;

pub use auth::{Authenticated, RequireStaff, RequireSuperAdmin};
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
