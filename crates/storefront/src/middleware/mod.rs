//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span, see [`http_span`])
//! 3. Request ID (records `x-request-id` in the span)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};

use axum::extract::Request;
use tracing::Span;

/// Span for one HTTP request, with an empty `request_id` field that
/// [`request_id_middleware`] fills in.
pub fn http_span(request: &Request) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = tracing::field::Empty,
    )
}
