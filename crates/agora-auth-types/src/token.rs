//! JWT access-token validation.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, get_current_timestamp};
use serde::Deserialize;
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
use serde::Serialize;

/// Algorithm identifier used when configuration does not name one.
pub const DEFAULT_ALGORITHM: &str = "HS256";

/// Identity extracted from a validated access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub user_id: i64,
    /// Expiration timestamp (seconds since UNIX epoch).
    pub expires_at: u64,
}

/// Errors returned by [`validate_access_token`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
    /// The configured algorithm cannot be used with a shared secret.
    #[error("unsupported signing algorithm {0:?}")]
    UnsupportedAlgorithm(String),
}

/// JWT claims payload shared by token creation (auth service) and validation.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `user_id` | custom | subject: id of the authenticated user |
/// | `iat` | `iat` | issue time, seconds since epoch; optional on decode |
/// | `exp` | `exp` | expiry, seconds since epoch |
///
/// [`Serialize`] requires the **`USE_ONLY_IN_AUTH_SERVICE`** cargo feature
/// because the auth service is the sole token issuer.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test), derive(Serialize))]
pub struct JwtClaims {
    pub user_id: i64,
    #[serde(default)]
    pub iat: Option<u64>,
    pub exp: u64,
}

/// Signing material for access tokens: the shared secret and the algorithm
/// identifier exactly as configured.
///
/// Build once and clone; clones share the secret. `Debug` never prints it.
#[derive(Clone)]
pub struct TokenKeys {
    secret: Arc<str>,
    algorithm: Arc<str>,
}

impl TokenKeys {
    pub fn new(secret: &str, algorithm: &str) -> Self {
        Self {
            secret: Arc::from(secret),
            algorithm: Arc::from(algorithm),
        }
    }

    pub fn secret(&self) -> &[u8] {
        self.secret.as_bytes()
    }

    /// Resolve the configured identifier to an HMAC algorithm.
    pub fn algorithm(&self) -> Result<Algorithm, AuthError> {
        signing_algorithm(&self.algorithm)
    }
}

impl fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenKeys")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// Map an algorithm identifier (case-insensitive) to a symmetric JWT algorithm.
///
/// Asymmetric families are rejected: the signing secret is a shared key.
pub fn signing_algorithm(name: &str) -> Result<Algorithm, AuthError> {
    let unsupported = || AuthError::UnsupportedAlgorithm(name.to_owned());
    let algorithm =
        Algorithm::from_str(&name.trim().to_ascii_uppercase()).map_err(|_| unsupported())?;
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        _ => Err(unsupported()),
    }
}

// ── Core decode (private) ────────────────────────────────────────────────

/// Decode and verify a JWT, returning raw claims.
///
/// Signature and algorithm are checked first; `exp` is then compared to the
/// current time without leeway, so a token is expired once `now >= exp`.
fn decode_jwt(token: &str, keys: &TokenKeys) -> Result<JwtClaims, AuthError> {
    let algorithm = keys.algorithm()?;

    let mut validation = Validation::new(algorithm);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(keys.secret()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "access token rejected");
        AuthError::Invalid
    })?;

    if get_current_timestamp() >= data.claims.exp {
        return Err(AuthError::Expired);
    }

    Ok(data.claims)
}

// ── Public: all consumers ────────────────────────────────────────────────

/// Validate a bearer token against the current signing keys.
///
/// Called on every protected request; trust is derived from `keys` each time,
/// so rotating the secret invalidates every previously issued token.
pub fn validate_access_token(token: &str, keys: &TokenKeys) -> Result<TokenInfo, AuthError> {
    let claims = decode_jwt(token, keys)?;
    Ok(TokenInfo {
        user_id: claims.user_id,
        expires_at: claims.exp,
    })
}
