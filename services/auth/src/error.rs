use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use agora_core::error::{bearer_challenge, error_body};

/// Auth service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    /// Unknown identifier and wrong password collapse into this one variant.
    #[error("Invalid Credentials")]
    InvalidCredentials,
    #[error("Could not validate credentials")]
    InvalidToken,
    #[error("Could not validate credentials")]
    TokenExpired,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            // Expired and invalid tokens are indistinguishable to clients.
            Self::InvalidToken | Self::TokenExpired => "INVALID_TOKEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let body = error_body(self.kind(), &self.to_string());
        match self {
            Self::InvalidCredentials => (StatusCode::FORBIDDEN, body).into_response(),
            Self::InvalidToken | Self::TokenExpired => {
                (StatusCode::UNAUTHORIZED, [bearer_challenge()], body).into_response()
            }
            Self::Internal(ref e) => {
                // Full anyhow chain stays in the logs; the client sees a generic body.
                tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
