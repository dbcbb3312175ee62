//! Request helpers for routes guarded by the bearer-token extractor.

use axum::http::HeaderValue;

/// `Authorization` header value carrying `token` with the bearer scheme.
pub fn bearer_value(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
}
