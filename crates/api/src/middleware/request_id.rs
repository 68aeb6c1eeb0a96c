//! Request ID middleware for log and error correlation.
//!
//! An upstream `x-request-id` is reused when it looks sane; otherwise a UUID
//! v4 is generated. The ID is recorded on the request span, tagged on the
//! Sentry scope, stored in the request extensions and echoed in the response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream ID accepted as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// The ID assigned to the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Reuse `upstream` if it is short printable ASCII, else generate a new ID.
fn resolve(upstream: Option<&str>) -> String {
    upstream
        .map(str::trim)
        .filter(|id| {
            !id.is_empty()
                && id.len() <= MAX_REQUEST_ID_LEN
                && id.bytes().all(|b| b.is_ascii_graphic())
        })
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}

/// Middleware that gives every request an ID.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = resolve(
        request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok()),
    );

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_id_is_reused() {
        assert_eq!(resolve(Some("cf-1234abcd")), "cf-1234abcd");
        assert_eq!(resolve(Some("  edge-7  ")), "edge-7");
    }

    #[test]
    fn test_bad_upstream_id_is_replaced() {
        for bad in [None, Some(""), Some("has space"), Some("ñ")] {
            let id = resolve(bad);
            assert!(Uuid::parse_str(&id).is_ok(), "{bad:?} should be replaced");
        }

        let too_long = "a".repeat(MAX_REQUEST_ID_LEN + 1);
        assert!(Uuid::parse_str(&resolve(Some(&too_long))).is_ok());
    }
}
