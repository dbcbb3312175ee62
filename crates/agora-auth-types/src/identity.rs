//! Bearer-token identity extractor for protected routes.

use agora_core::error::AppError;
use axum::extract::{FromRef, FromRequestParts};
use http::header::AUTHORIZATION;
use http::request::Parts;

use crate::token::{AuthError, TokenKeys, validate_access_token};

/// The authenticated caller of a protected request.
///
/// Decoded from `Authorization: Bearer <token>` against the [`TokenKeys`]
/// held in application state. Missing, malformed, forged and expired tokens
/// are all rejected with the same 401 so the client cannot tell them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: i64,
    pub expires_at: u64,
}

/// Extract the token from an `Authorization` header value. The scheme is
/// matched case-insensitively.
pub fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    TokenKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    // Resolve synchronously and hand back a 'static future; see axum-core 0.5
    // `FromRequestParts` signature.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let keys = TokenKeys::from_ref(state);
        let result = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or(AppError::Unauthorized)
            .and_then(|token| match validate_access_token(token, &keys) {
                Ok(info) => Ok(Self {
                    user_id: info.user_id,
                    expires_at: info.expires_at,
                }),
                Err(AuthError::UnsupportedAlgorithm(name)) => Err(AppError::Internal(
                    anyhow::anyhow!("configured signing algorithm {name:?} is unusable"),
                )),
                Err(_) => Err(AppError::Unauthorized),
            });

        async move { result }
    }
}
