use chrono::{DateTime, Utc};
use serde::Serialize;

/// Login-relevant user data fetched from persistence.
#[derive(Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    /// bcrypt hash of the user's password.
    pub password_hash: String,
}

impl std::fmt::Debug for AuthUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthUser")
            .field("id", &self.id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// A freshly issued access token. Never persisted.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// Encoded JWT handed to the client.
    pub token: String,
    pub user_id: i64,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// OAuth2-style token response body.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

impl From<AccessToken> for TokenResponse {
    fn from(token: AccessToken) -> Self {
        Self {
            access_token: token.token,
            token_type: "bearer",
        }
    }
}
