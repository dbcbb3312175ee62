use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Error variants shared by every Agora HTTP surface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing, malformed, forged or expired bearer token. The cause is never
    /// surfaced to the client.
    #[error("Could not validate credentials")]
    Unauthorized,
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

/// JSON body used by all Agora error responses.
pub fn error_body(kind: &str, detail: &str) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "kind": kind,
        "detail": detail,
    }))
}

/// `WWW-Authenticate` challenge attached to every 401.
pub fn bearer_challenge() -> (header::HeaderName, HeaderValue) {
    (header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = error_body(self.kind(), &self.to_string());
        match self {
            Self::Unauthorized => {
                (StatusCode::UNAUTHORIZED, [bearer_challenge()], body).into_response()
            }
            Self::Internal(ref e) => {
                // 4xx are expected client errors and already covered by the trace layer.
                tracing::error!(error = %e, kind = "INTERNAL", "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
