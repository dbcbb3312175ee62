use std::sync::{Arc, LazyLock};
use std::time::Duration;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode, get_current_timestamp};

use agora_auth_types::token::{AuthError, JwtClaims, TokenKeys, validate_access_token};

use crate::config::Settings;
use crate::domain::password::{hash_password, verify_password};
use crate::domain::repository::UserRepository;
use crate::domain::types::AccessToken;
use crate::error::AuthServiceError;

fn timestamp(secs: u64) -> anyhow::Result<DateTime<Utc>> {
    let secs = i64::try_from(secs).context("timestamp overflows i64")?;
    DateTime::from_timestamp(secs, 0).context("timestamp out of range")
}

/// Issue an access token for `user_id` using the configured secret,
/// algorithm and lifetime.
pub fn issue_access_token(
    user_id: i64,
    settings: &Settings,
) -> Result<AccessToken, AuthServiceError> {
    issue_access_token_with_lifetime(
        user_id,
        settings.token_keys(),
        settings.access_token_lifetime(),
    )
}

/// Issue an access token that expires `lifetime` after now.
pub fn issue_access_token_with_lifetime(
    user_id: i64,
    keys: &TokenKeys,
    lifetime: Duration,
) -> Result<AccessToken, AuthServiceError> {
    let algorithm = keys
        .algorithm()
        .map_err(|e| AuthServiceError::Internal(e.into()))?;

    let iat = get_current_timestamp();
    let exp = iat.saturating_add(lifetime.as_secs());
    let claims = JwtClaims {
        user_id,
        iat: Some(iat),
        exp,
    };
    let token = encode(
        &Header::new(algorithm),
        &claims,
        &EncodingKey::from_secret(keys.secret()),
    )
    .context("sign access token")?;

    Ok(AccessToken {
        token,
        user_id,
        issued_at: timestamp(iat)?,
        expires_at: timestamp(exp)?,
    })
}

/// Validate a token against the current settings and return its subject.
pub fn validate_token(token: &str, settings: &Settings) -> Result<i64, AuthServiceError> {
    validate_access_token(token, settings.token_keys())
        .map(|info| info.user_id)
        .map_err(|e| match e {
            AuthError::Expired => AuthServiceError::TokenExpired,
            AuthError::Invalid => AuthServiceError::InvalidToken,
            AuthError::UnsupportedAlgorithm(_) => AuthServiceError::Internal(e.into()),
        })
}

// ── Login ────────────────────────────────────────────────────────────────────

/// Hash checked when the identifier is unknown so both rejection paths cost
/// one bcrypt verification.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("agora-placeholder-password").ok());

/// Compute the placeholder hash ahead of the first login.
///
/// Returns `false` if hashing failed, in which case unknown identifiers are
/// rejected without a bcrypt check.
pub fn prepare_login() -> bool {
    LazyLock::force(&DUMMY_HASH).is_some()
}

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginInput")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Password login: look the user up, verify the password, issue a token.
///
/// Unknown email and wrong password both end in
/// [`AuthServiceError::InvalidCredentials`].
pub struct LoginUseCase<U: UserRepository> {
    pub users: U,
    pub settings: Arc<Settings>,
}

impl<U: UserRepository> LoginUseCase<U> {
    pub async fn execute(&self, input: LoginInput) -> Result<AccessToken, AuthServiceError> {
        let user = self.users.find_by_email(&input.email).await?;

        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let password = input.password;
        let verified = tokio::task::spawn_blocking(move || {
            stored_hash
                .as_deref()
                .or(DUMMY_HASH.as_deref())
                .is_some_and(|hash| verify_password(&password, hash))
        })
        .await
        .context("password verification task")?;

        let Some(user) = user else {
            tracing::info!(email = %input.email, "login: user not found");
            return Err(AuthServiceError::InvalidCredentials);
        };
        tracing::info!(email = %input.email, user_id = user.id, verified, "login: user found");
        if !verified {
            return Err(AuthServiceError::InvalidCredentials);
        }

        issue_access_token(user.id, &self.settings)
    }
}
