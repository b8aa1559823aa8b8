// ============================
// crates/backend-lib/src/credential/strength.rs
// ============================
//! Password strength scoring and the acceptance gate for new credentials.
use serde::Serialize;
use std::fmt;

/// Discrete strength grade for a candidate secret.
///
/// Ordered: appending characters or covering more character classes never
/// lowers the grade.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthGrade {
    TooShort,
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

impl fmt::Display for StrengthGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StrengthGrade::TooShort => "Too short",
            StrengthGrade::Weak => "Weak",
            StrengthGrade::Medium => "Medium",
            StrengthGrade::Strong => "Strong",
            StrengthGrade::VeryStrong => "Very Strong",
        };
        write!(f, "{label}")
    }
}

/// Count satisfied character classes: upper, lower, digit, symbol.
fn class_count(secret: &str) -> usize {
    let has_upper = secret.chars().any(char::is_uppercase);
    let has_lower = secret.chars().any(char::is_lowercase);
    let has_digit = secret.chars().any(char::is_numeric);
    let has_symbol = secret.chars().any(|c| !c.is_alphanumeric());
    usize::from(has_upper) + usize::from(has_lower) + usize::from(has_digit) + usize::from(has_symbol)
}

/// Grade a candidate secret by length and character-class coverage.
pub fn assess_strength(secret: &str) -> StrengthGrade {
    let length = secret.chars().count();
    if length < 6 {
        return StrengthGrade::TooShort;
    }
    if length < 8 {
        return StrengthGrade::Weak;
    }

    let classes = class_count(secret);
    if classes >= 4 && length >= 12 {
        StrengthGrade::VeryStrong
    } else if classes >= 3 && length >= 10 {
        StrengthGrade::Strong
    } else if classes >= 2 {
        StrengthGrade::Medium
    } else {
        StrengthGrade::Weak
    }
}

/// Admission gate for new or changed credentials: length >= 8 and at
/// least 3 of the 4 character classes. Independent of the descriptive
/// grade and never consulted during verification.
pub fn is_acceptable(secret: &str) -> bool {
    secret.chars().count() >= 8 && class_count(secret) >= 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(assess_strength("Ab1!"), StrengthGrade::TooShort);
        assert_eq!(assess_strength("Ab1!xy"), StrengthGrade::Weak);
        // 8 chars, 3 classes, but below the 10-char Strong threshold
        assert_eq!(assess_strength("Passw0rd"), StrengthGrade::Medium);
        // 11 chars, 4 classes, below the 12-char VeryStrong threshold
        assert_eq!(assess_strength("Str0ng!Pass"), StrengthGrade::Strong);
        assert_eq!(assess_strength("Str0ng!Passw"), StrengthGrade::VeryStrong);
        // long but single-class stays weak
        assert_eq!(assess_strength("aaaaaaaaaaaaaaaa"), StrengthGrade::Weak);
    }

    #[test]
    fn test_grade_monotonic_in_added_classes() {
        // Appending a character from a missing class never lowers the grade
        let samples = ["abcdefghij", "ABCDEFGHIJ", "abcdEFGHij", "abcd3fgh1j"];
        for base in samples {
            let mut current = base.to_string();
            let baseline = assess_strength(&current);
            let mut last = baseline;
            for extra in ['A', 'a', '1', '!'] {
                current.push(extra);
                let graded = assess_strength(&current);
                assert!(graded >= last, "{current}: {graded:?} < {last:?}");
                last = graded;
            }
        }
    }

    #[test]
    fn test_acceptance_gate() {
        assert!(is_acceptable("Str0ng!Pass"));
        assert!(is_acceptable("Passw0rd"));
        // too short
        assert!(!is_acceptable("Ab1!xyz"));
        // only two classes
        assert!(!is_acceptable("abcdefgh1"));
        assert!(!is_acceptable(""));
    }

    #[test]
    fn test_gate_and_grade_are_independent() {
        // Medium grade can still be acceptable
        assert_eq!(assess_strength("Passw0rd"), StrengthGrade::Medium);
        assert!(is_acceptable("Passw0rd"));
        // Long two-class secret grades Medium but fails the gate
        assert_eq!(assess_strength("abcdefgh1234"), StrengthGrade::Medium);
        assert!(!is_acceptable("abcdefgh1234"));
    }

    #[test]
    fn test_counts_unicode_by_chars() {
        // 6 multibyte chars count as 6, not their byte length
        assert_eq!(assess_strength("密密密密密密"), StrengthGrade::Weak);
    }
}
