//! Environment snapshot builders.

use agora_core::config::EnvSnapshot;

/// Snapshot containing exactly `pairs`.
pub fn env_snapshot(pairs: &[(&str, &str)]) -> EnvSnapshot {
    EnvSnapshot::from_pairs(pairs.iter().copied())
}

/// Discrete database fields plus a signing secret: the smallest environment
/// that resolves successfully.
pub fn discrete_env() -> Vec<(&'static str, &'static str)> {
    vec![
        ("DATABASE_HOSTNAME", "localhost"),
        ("DATABASE_PORT", "5432"),
        ("DATABASE_USERNAME", "postgres"),
        ("DATABASE_PASSWORD", "hunter2"),
        ("DATABASE_NAME", "agora"),
        ("SECRET_KEY", "09d25e094faa6ca2556c818166b7a9563b93f7099f6f0f4caa6cf63b88e8d3e7"),
    ]
}

/// Like [`discrete_env`] with `overrides` replacing or adding keys.
pub fn discrete_env_with(overrides: &[(&'static str, &'static str)]) -> EnvSnapshot {
    let mut pairs = discrete_env();
    pairs.retain(|(k, _)| !overrides.iter().any(|(o, _)| o == k));
    pairs.extend_from_slice(overrides);
    env_snapshot(&pairs)
}

/// Like [`discrete_env`] without the listed keys.
pub fn discrete_env_without(removed: &[&str]) -> EnvSnapshot {
    let mut pairs = discrete_env();
    pairs.retain(|(k, _)| !removed.contains(k));
    env_snapshot(&pairs)
}
