// ============================
// crates/backend-lib/src/credential/digest.rs
// ============================
//! Password hashing and verification.
//!
//! Stored digests come in two formats: the current `salt:hash` form and a
//! legacy bare hex digest with no separator. Verification supports both,
//! permanently, so credentials issued before salting keep authenticating;
//! every newly hashed credential uses the salted form.
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::rngs::OsRng;
use rand::TryRngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::error::AppError;

/// Salt length in raw bytes, before base64 encoding.
const SALT_LENGTH: usize = 16;

/// Hash a secret with a fresh random salt.
///
/// Returns `"{salt}:{hash}"` where `salt` is base64 of [`SALT_LENGTH`]
/// OS-random bytes and `hash` is lowercase hex SHA-256 of the encoded
/// salt followed by the secret bytes.
pub fn hash(secret: &str) -> Result<String, AppError> {
    let salt = generate_salt()?;
    Ok(hash_with_salt(secret, &salt))
}

/// Hash a secret and zeroize the plaintext afterwards.
pub fn hash_wiping(secret: &mut String) -> Result<String, AppError> {
    let digest = hash(secret)?;
    secret.zeroize();
    Ok(digest)
}

fn hash_with_salt(secret: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(secret.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{salt}:{digest}")
}

/// Verify a secret against a stored digest, current or legacy format.
pub fn verify(secret: &str, stored: &str) -> bool {
    match stored.split_once(':') {
        // NOTE: plain equality, not a constant-time comparison.
        Some((salt, _expected)) => hash_with_salt(secret, salt) == stored,
        None => legacy_digest(secret) == stored,
    }
}

/// Unsalted SHA-256 hex digest, retained for legacy verification and
/// exposed for migration tooling.
pub fn legacy_digest(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

fn generate_salt() -> Result<String, AppError> {
    let mut salt = [0u8; SALT_LENGTH];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|_| AppError::EntropyUnavailable)?;
    Ok(BASE64.encode(salt))
}
