// ============================
// crates/backend-lib/src/validation.rs
// ============================
//! Login input validation.
use regex::Regex;
use std::sync::LazyLock;

use crate::error::AppError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Validate a login identifier (email shape).
pub fn validate_identifier(identifier: &str) -> Result<&str, AppError> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(AppError::InvalidInput("Email must not be empty".to_string()));
    }
    if identifier.len() > MAX_EMAIL_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "Email must be at most {MAX_EMAIL_LENGTH} characters"
        )));
    }
    if !EMAIL_REGEX.is_match(identifier) {
        return Err(AppError::InvalidInput("Invalid email format".to_string()));
    }
    Ok(identifier)
}

/// Reject empty secrets before they reach verification.
pub fn validate_secret_present(secret: &str) -> Result<(), AppError> {
    if secret.is_empty() {
        return Err(AppError::InvalidInput("Password is required".to_string()));
    }
    Ok(())
}
