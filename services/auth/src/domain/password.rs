//! bcrypt credential hashing and verification.

use anyhow::Context as _;

/// Work factor for new hashes.
pub const HASH_COST: u32 = bcrypt::DEFAULT_COST;

/// Hash `plaintext` with a fresh salt.
pub fn hash_password(plaintext: &str) -> anyhow::Result<String> {
    bcrypt::hash(plaintext, HASH_COST).context("hash password")
}

/// Check `plaintext` against a stored bcrypt hash.
///
/// bcrypt compares digests in constant time. A stored hash that cannot be
/// parsed verifies as `false`; neither argument is ever logged.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
    match bcrypt::verify(plaintext, stored_hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is unusable");
            false
        }
    }
}
