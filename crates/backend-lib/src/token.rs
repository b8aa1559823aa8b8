// ============================
// crates/backend-lib/src/token.rs
// ============================
//! Secure token generation for session identifiers and remember tokens.
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::error::AppError;

/// Default token size in bytes (32 bytes = 256 bits of entropy)
const DEFAULT_TOKEN_BYTES: usize = 32;

/// Generate a cryptographically secure random token.
///
/// Entropy comes from the operating system; if the source fails the call
/// aborts with `EntropyUnavailable` instead of falling back to anything
/// weaker.
pub fn generate_secure_token() -> Result<String, AppError> {
    generate_secure_token_with_size(DEFAULT_TOKEN_BYTES)
}

/// Generate a cryptographically secure random token of `bytes` bytes,
/// base64 URL-safe encoded without padding.
pub fn generate_secure_token_with_size(bytes: usize) -> Result<String, AppError> {
    let mut buffer = vec![0u8; bytes];
    OsRng
        .try_fill_bytes(&mut buffer)
        .map_err(|_| AppError::EntropyUnavailable)?;
    Ok(URL_SAFE_NO_PAD.encode(buffer))
}

/// Draw a uniform index in `0..bound` from OS entropy.
///
/// Rejection sampling keeps the draw unbiased for bounds that do not
/// divide `u32::MAX + 1`.
pub(crate) fn secure_index(bound: usize) -> Result<usize, AppError> {
    debug_assert!(bound > 0 && bound <= u32::MAX as usize);
    let bound = bound as u32;
    let zone = u32::MAX - (u32::MAX % bound);
    loop {
        let value = OsRng
            .try_next_u32()
            .map_err(|_| AppError::EntropyUnavailable)?;
        if value < zone {
            return Ok((value % bound) as usize);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_generation() {
        // Generate two tokens and verify they're different
        let token1 = generate_secure_token().unwrap();
        let token2 = generate_secure_token().unwrap();

        assert_ne!(token1, token2);

        // 32 bytes of entropy encoded in unpadded base64 is 43 chars
        assert!(token1.len() >= 42);

        // Test custom size
        let small_token = generate_secure_token_with_size(16).unwrap();
        let large_token = generate_secure_token_with_size(64).unwrap();

        assert!(small_token.len() < token1.len());
        assert!(large_token.len() > token1.len());
    }

    #[test]
    fn test_secure_index_stays_in_bounds() {
        for _ in 0..1000 {
            let idx = secure_index(7).unwrap();
            assert!(idx < 7);
        }
        assert_eq!(secure_index(1).unwrap(), 0);
    }
}
