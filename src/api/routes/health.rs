//! Root Routes
//!
//! - GET / - Liveness check, body `OK`
//! - anything unmatched - 404

use axum::http::StatusCode;

/// GET /
///
/// Answers only the exact root path; other paths fall through to
/// [`not_found`].
pub async fn root() -> &'static str {
    "OK"
}

/// Fallback for unmatched paths
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "404 page not found")
}
