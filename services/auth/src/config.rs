//! Auth service configuration resolved from an environment snapshot.
//!
//! Hosting providers frequently set a disabled variable to a placeholder such
//! as `"false"` instead of leaving it unset. Every field that may carry such a
//! placeholder goes through [`normalize_or_none`] before it is used.

use std::fmt;
use std::time::Duration;

use agora_auth_types::token::{DEFAULT_ALGORITHM, TokenKeys, signing_algorithm};
use agora_core::config::EnvSnapshot;
use anyhow::Context as _;
use url::Url;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const DATABASE_HOSTNAME: &str = "DATABASE_HOSTNAME";
pub const DATABASE_PORT: &str = "DATABASE_PORT";
pub const DATABASE_USERNAME: &str = "DATABASE_USERNAME";
pub const DATABASE_PASSWORD: &str = "DATABASE_PASSWORD";
pub const DATABASE_NAME: &str = "DATABASE_NAME";
pub const SECRET_KEY: &str = "SECRET_KEY";
pub const ALGORITHM: &str = "ALGORITHM";
pub const ACCESS_TOKEN_EXPIRE_MINUTES: &str = "ACCESS_TOKEN_EXPIRE_MINUTES";
pub const PORT: &str = "PORT";

/// Token lifetime used when `ACCESS_TOKEN_EXPIRE_MINUTES` is absent or unusable.
pub const DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES: u32 = 30;

/// Listen port used when `PORT` is absent or unparsable.
pub const DEFAULT_PORT: u16 = 8000;

/// Raw values that mean "not provided", compared case-insensitively after trimming.
const SENTINELS: [&str; 5] = ["", "false", "none", "null", "0"];

/// Treat placeholder values as absent.
///
/// Returns `None` for a missing value and for any of `""`, `"false"`,
/// `"none"`, `"null"`, `"0"` (case-insensitive, surrounding whitespace
/// ignored). Any other value is returned unchanged.
pub fn normalize_or_none(raw: Option<&str>) -> Option<&str> {
    let raw = raw?;
    let trimmed = raw.trim();
    if SENTINELS.iter().any(|s| trimmed.eq_ignore_ascii_case(s)) {
        None
    } else {
        Some(raw)
    }
}

/// `Some(bool)` when `raw` spells a boolean.
fn boolean_like(raw: &str) -> Option<bool> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Coerce `ACCESS_TOKEN_EXPIRE_MINUTES` to a positive minute count.
///
/// Integers are taken as-is, booleans count as 1 or 0, decimal strings are
/// truncated toward zero. Everything else, and any result that is not a
/// positive `u32`, yields [`DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES`].
pub fn coerce_token_lifetime(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES;
    };
    let trimmed = raw.trim();

    let minutes = if let Some(flag) = boolean_like(trimmed) {
        Some(i64::from(flag))
    } else if let Ok(n) = trimmed.parse::<i64>() {
        Some(n)
    } else {
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i64)
    };

    match minutes.and_then(|m| u32::try_from(m).ok()).filter(|m| *m > 0) {
        Some(m) => m,
        None => {
            tracing::warn!(
                value = trimmed,
                default = DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES,
                "unusable {ACCESS_TOKEN_EXPIRE_MINUTES}, using default"
            );
            DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES
        }
    }
}

// ── Errors ───────────────────────────────────────────────────────────────────

/// A single reason the environment could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldProblem {
    Missing(&'static str),
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl FieldProblem {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing(field) | Self::Invalid { field, .. } => *field,
        }
    }
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(field) => write!(f, "{field} is missing"),
            Self::Invalid { field, reason } => write!(f, "{field} {reason}"),
        }
    }
}

/// Startup-fatal configuration failure listing every problem found.
#[derive(Debug, thiserror::Error)]
#[error("invalid configuration: {}", render_problems(.problems))]
pub struct ConfigError {
    problems: Vec<FieldProblem>,
}

fn render_problems(problems: &[FieldProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ConfigError {
    pub fn problems(&self) -> &[FieldProblem] {
        &self.problems
    }

    /// Whether any problem concerns `field`.
    pub fn mentions(&self, field: &str) -> bool {
        self.problems.iter().any(|p| p.field() == field)
    }
}

// ── Settings ─────────────────────────────────────────────────────────────────

/// Connection fields for the persistence collaborator. Always fully populated.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub name: String,
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .finish()
    }
}

/// Fully resolved auth service configuration.
///
/// Built once at startup by [`Settings::resolve`] and shared read-only
/// afterwards. There is no partially resolved state: construction either
/// yields every field or fails with a [`ConfigError`].
#[derive(Clone)]
pub struct Settings {
    database: DatabaseSettings,
    database_url_provided: bool,
    secret_key: String,
    algorithm: String,
    token_keys: TokenKeys,
    access_token_expire_minutes: u32,
    port: u16,
}

/// Database fields parsed out of `DATABASE_URL`; any may be absent.
/// Userinfo and database name are percent-decoded.
#[derive(Default)]
struct UrlParts {
    host: Option<String>,
    port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    name: Option<String>,
}

impl UrlParts {
    fn parse(raw: &str) -> Option<Self> {
        let url = Url::parse(raw.trim()).ok()?;
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_owned());
        let decoded = |s: &str| -> Option<Option<String>> {
            if s.is_empty() {
                return Some(None);
            }
            urlencoding::decode(s).ok().map(|d| Some(d.into_owned()))
        };
        Some(Self {
            host: url
                .host_str()
                .map(|h| h.trim_start_matches('[').trim_end_matches(']'))
                .and_then(non_empty),
            port: url.port(),
            username: decoded(url.username())?,
            password: decoded(url.password().unwrap_or_default())?,
            name: decoded(url.path().trim_start_matches('/'))?,
        })
    }
}

impl Settings {
    /// Resolve settings from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(&EnvSnapshot::from_process())
    }

    /// Resolve settings from a raw environment snapshot.
    ///
    /// Discrete `DATABASE_*` fields win over values parsed from
    /// `DATABASE_URL`. Without a URL all five discrete fields are required.
    /// `SECRET_KEY` must be a real secret. `ALGORITHM` and
    /// `ACCESS_TOKEN_EXPIRE_MINUTES` fall back to defaults. All problems are
    /// collected and reported together.
    pub fn resolve(env: &EnvSnapshot) -> Result<Self, ConfigError> {
        let mut problems = Vec::new();

        let url_raw = normalize_or_none(env.get(DATABASE_URL));
        let url_parts = match url_raw {
            Some(raw) => UrlParts::parse(raw).unwrap_or_else(|| {
                problems.push(FieldProblem::Invalid {
                    field: DATABASE_URL,
                    reason: "is not a valid connection URL",
                });
                UrlParts::default()
            }),
            None => UrlParts::default(),
        };

        let discrete = |key: &str| {
            env.get(key)
                .filter(|v| !v.trim().is_empty())
                .map(str::to_owned)
        };

        let host = discrete(DATABASE_HOSTNAME).or(url_parts.host);
        let port = match discrete(DATABASE_PORT) {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) => Some(port),
                Err(_) => {
                    problems.push(FieldProblem::Invalid {
                        field: DATABASE_PORT,
                        reason: "is not a valid port number",
                    });
                    None
                }
            },
            None => url_parts.port,
        };
        let username = discrete(DATABASE_USERNAME).or(url_parts.username);
        let password = discrete(DATABASE_PASSWORD).or(url_parts.password);
        let name = discrete(DATABASE_NAME).or(url_parts.name);

        // An unparsable discrete port is already reported as invalid.
        let port_reported = problems.iter().any(|p| p.field() == DATABASE_PORT);
        for (field, present) in [
            (DATABASE_HOSTNAME, host.is_some()),
            (DATABASE_PORT, port.is_some() || port_reported),
            (DATABASE_PASSWORD, password.is_some()),
            (DATABASE_NAME, name.is_some()),
            (DATABASE_USERNAME, username.is_some()),
        ] {
            if !present {
                problems.push(FieldProblem::Missing(field));
            }
        }

        let secret_key = match env.get(SECRET_KEY) {
            None => {
                problems.push(FieldProblem::Missing(SECRET_KEY));
                None
            }
            Some(raw) if normalize_or_none(Some(raw)).is_none() => {
                problems.push(FieldProblem::Invalid {
                    field: SECRET_KEY,
                    reason: "must not be empty or a placeholder value",
                });
                None
            }
            Some(raw) if boolean_like(raw).is_some() => {
                problems.push(FieldProblem::Invalid {
                    field: SECRET_KEY,
                    reason: "must not be a boolean",
                });
                None
            }
            Some(raw) => Some(raw.to_owned()),
        };

        let algorithm = normalize_or_none(env.get(ALGORITHM))
            .map(|a| a.trim().to_owned())
            .unwrap_or_else(|| DEFAULT_ALGORITHM.to_owned());
        if signing_algorithm(&algorithm).is_err() {
            tracing::warn!(
                algorithm = %algorithm,
                "{ALGORITHM} is not a supported HMAC algorithm; token issuance will fail"
            );
        }

        let access_token_expire_minutes =
            coerce_token_lifetime(env.get(ACCESS_TOKEN_EXPIRE_MINUTES));

        let port_setting = env
            .get(PORT)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        match (host, port, username, password, name, secret_key) {
            (Some(host), Some(port), Some(username), Some(password), Some(name), Some(secret))
                if problems.is_empty() =>
            {
                Ok(Self {
                    database: DatabaseSettings {
                        host,
                        port,
                        username,
                        password,
                        name,
                    },
                    database_url_provided: url_raw.is_some(),
                    token_keys: TokenKeys::new(&secret, &algorithm),
                    secret_key: secret,
                    algorithm,
                    access_token_expire_minutes,
                    port: port_setting,
                })
            }
            _ => Err(ConfigError { problems }),
        }
    }

    pub fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    /// Whether a usable `DATABASE_URL` took part in resolution.
    pub fn database_url_provided(&self) -> bool {
        self.database_url_provided
    }

    /// Connection URL rebuilt from the resolved fields.
    ///
    /// Username, password and database name are percent-encoded, `%` included,
    /// so the driver decodes them back to the resolved values.
    pub fn database_url(&self) -> anyhow::Result<Url> {
        let db = &self.database;
        let host = if db.host.contains(':') {
            format!("[{}]", db.host)
        } else {
            db.host.clone()
        };
        Url::parse(&format!(
            "postgres://{}:{}@{host}:{}/{}",
            urlencoding::encode(&db.username),
            urlencoding::encode(&db.password),
            db.port,
            urlencoding::encode(&db.name),
        ))
        .context("database settings cannot be rendered as a URL")
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn access_token_expire_minutes(&self) -> u32 {
        self.access_token_expire_minutes
    }

    pub fn access_token_lifetime(&self) -> Duration {
        Duration::from_secs(u64::from(self.access_token_expire_minutes) * 60)
    }

    /// TCP port to listen on. Env var: `PORT`.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Signing material handed to the token service and the request extractor.
    pub fn token_keys(&self) -> &TokenKeys {
        &self.token_keys
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("database", &self.database)
            .field("database_url_provided", &self.database_url_provided)
            .field("secret_key", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field(
                "access_token_expire_minutes",
                &self.access_token_expire_minutes,
            )
            .field("port", &self.port)
            .finish()
    }
}
