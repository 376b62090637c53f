//! Request ID middleware for request tracing and correlation.
//!
//! Generates a UUID v4 for each request if not provided by an upstream proxy
//! (e.g., a load balancer). The request ID is:
//! - Recorded in the current tracing span
//! - Added to the Sentry scope for error correlation
//! - Stored in the request extensions as [`RequestId`]
//! - Returned in the response headers

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream request ID that is accepted as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// The ID of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Pick the request ID: the upstream header if it is usable, else a new UUID.
fn resolve_request_id(header: Option<&HeaderValue>) -> String {
    header
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}

/// Middleware that ensures every request has a unique request ID.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = resolve_request_id(request.headers().get(REQUEST_ID_HEADER));

    // Record in current span for structured logging
    Span::current().record("request_id", &request_id);

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
    fn test_upstream_id_is_kept() {
        let header = HeaderValue::from_static("abc-123");
        assert_eq!(resolve_request_id(Some(&header)), "abc-123");
    }

    #[test]
    fn test_missing_or_blank_id_is_generated() {
        let generated = resolve_request_id(None);
        assert!(Uuid::parse_str(&generated).is_ok());

        let blank = HeaderValue::from_static("   ");
        assert!(Uuid::parse_str(&resolve_request_id(Some(&blank))).is_ok());
    }

    #[test]
    fn test_oversized_id_is_replaced() {
        let long = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        let header = HeaderValue::from_str(&long).ok();
        let id = resolve_request_id(header.as_ref());
        assert_ne!(id, long);
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
