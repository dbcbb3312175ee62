use std::collections::HashMap;

/// Immutable snapshot of raw environment variables taken once at startup.
///
/// Services resolve their typed configuration from a snapshot rather than
/// reading `std::env` at each call site, so tests can build one from literal
/// pairs without touching process state.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the process environment, layered over a `.env` file in the
    /// working directory when one exists. Process variables win over file
    /// entries.
    pub fn from_process() -> Self {
        let mut vars = HashMap::new();
        match dotenvy::dotenv_iter() {
            Ok(iter) => {
                for item in iter {
                    match item {
                        Ok((key, value)) => {
                            vars.insert(key, value);
                        }
                        Err(e) => tracing::warn!(error = %e, "skipping unreadable .env entry"),
                    }
                }
            }
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "failed to read .env file"),
        }
        vars.extend(std::env::vars());
        Self { vars }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Raw value of `key`, or `None` when the variable is not set at all.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}
