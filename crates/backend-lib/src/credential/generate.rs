// ============================
// crates/backend-lib/src/credential/generate.rs
// ============================
//! Random credential generation.
use crate::credential::strength;
use crate::error::AppError;
use crate::token::secure_index;

const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Minimum length of a generated credential.
const MIN_GENERATED_LENGTH: usize = 8;

/// Generate a random credential of at least `length` characters
/// (clamped to [`MIN_GENERATED_LENGTH`]).
///
/// One character from each of the four classes is placed first, the rest
/// are drawn uniformly from the combined alphabet, and the whole sequence
/// is then shuffled (Fisher-Yates) so the guaranteed characters are not
/// positionally predictable. The output always passes
/// [`strength::is_acceptable`].
pub fn generate(length: usize) -> Result<String, AppError> {
    let length = length.max(MIN_GENERATED_LENGTH);

    let uppercase: Vec<char> = UPPERCASE.chars().collect();
    let lowercase: Vec<char> = LOWERCASE.chars().collect();
    let digits: Vec<char> = DIGITS.chars().collect();
    let symbols: Vec<char> = SYMBOLS.chars().collect();
    let combined: Vec<char> = [UPPERCASE, LOWERCASE, DIGITS, SYMBOLS].concat().chars().collect();

    let mut chars = Vec::with_capacity(length);

    // One character from each class, so coverage holds by construction
    chars.push(uppercase[secure_index(uppercase.len())?]);
    chars.push(lowercase[secure_index(lowercase.len())?]);
    chars.push(digits[secure_index(digits.len())?]);
    chars.push(symbols[secure_index(symbols.len())?]);

    while chars.len() < length {
        chars.push(combined[secure_index(combined.len())?]);
    }

    // Fisher-Yates shuffle
    for i in (1..chars.len()).rev() {
        let j = secure_index(i + 1)?;
        chars.swap(i, j);
    }

    let secret: String = chars.into_iter().collect();
    debug_assert!(strength::is_acceptable(&secret));
    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::strength::is_acceptable;

    #[test]
    fn test_generated_secrets_are_acceptable() {
        for _ in 0..1000 {
            let secret = generate(12).unwrap();
            assert_eq!(secret.chars().count(), 12);
            assert!(is_acceptable(&secret), "unacceptable: {secret}");
            assert!(secret.chars().any(|c| c.is_uppercase()));
            assert!(secret.chars().any(|c| c.is_lowercase()));
            assert!(secret.chars().any(|c| c.is_numeric()));
            assert!(secret.chars().any(|c| !c.is_alphanumeric()));
        }
    }

    #[test]
    fn test_length_clamped_to_minimum() {
        assert_eq!(generate(4).unwrap().chars().count(), 8);
        assert_eq!(generate(0).unwrap().chars().count(), 8);
        assert_eq!(generate(9).unwrap().chars().count(), 9);
        assert_eq!(generate(64).unwrap().chars().count(), 64);
    }

    #[test]
    fn test_uses_only_known_alphabet() {
        let combined: String = [UPPERCASE, LOWERCASE, DIGITS, SYMBOLS].concat();
        let secret = generate(32).unwrap();
        assert!(secret.chars().all(|c| combined.contains(c)));
    }

    #[test]
    fn test_outputs_differ() {
        let a = generate(16).unwrap();
        let b = generate(16).unwrap();
        assert_ne!(a, b);
    }
}
