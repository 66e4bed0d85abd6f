/// Account slug validation and availability
///
/// A slug is the account's globally unique, human-readable identifier.
/// Validation runs four checks in a fixed order and reports the first
/// failure only; each failure carries its own user-facing reason:
///
/// 1. not empty
/// 2. pattern: lowercase letters/digits in hyphen-separated groups, with no
///    leading, trailing, or doubled hyphens
/// 3. length between 3 and 50
/// 4. no existing account with the slug
///
/// The existence check is advisory. The `accounts_slug_key` unique
/// constraint is the authoritative check at commit time; a violation there
/// is translated back into [`SlugError::Taken`].

use sqlx::PgPool;
use thiserror::Error;

use crate::models::account::Account;

/// Minimum slug length
pub const SLUG_MIN_LENGTH: usize = 3;

/// Maximum slug length
pub const SLUG_MAX_LENGTH: usize = 50;

/// Name of the unique constraint backing slug uniqueness
const SLUG_CONSTRAINT: &str = "accounts_slug_key";

/// Slug rejection reasons, in check order
///
/// The Display strings are user-facing and stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SlugError {
    /// Check 1: empty input
    #[error("Address cannot be empty")]
    Empty,

    /// Check 2: illegal characters or hyphen placement
    #[error("Address may only contain lowercase letters and numbers, separated by single hyphens")]
    Pattern,

    /// Check 3: out of the [3, 50] length range
    #[error("Address must be between 3 and 50 characters")]
    Length,

    /// Check 4: an account already holds this slug
    #[error("This address is already taken")]
    Taken,
}

/// Validates the slug's shape (checks 1–3), in order, first failure wins
pub fn validate_slug_format(slug: &str) -> Result<(), SlugError> {
    if slug.is_empty() {
        return Err(SlugError::Empty);
    }

    if !matches_slug_pattern(slug) {
        return Err(SlugError::Pattern);
    }

    if slug.len() < SLUG_MIN_LENGTH || slug.len() > SLUG_MAX_LENGTH {
        return Err(SlugError::Length);
    }

    Ok(())
}

/// Equivalent to the pattern `^[a-z0-9]+(-[a-z0-9]+)*$`
fn matches_slug_pattern(slug: &str) -> bool {
    // Tracks whether the previous character was a hyphen (or the start),
    // which makes a hyphen here illegal.
    let mut at_group_start = true;

    for c in slug.chars() {
        match c {
            'a'..='z' | '0'..='9' => at_group_start = false,
            '-' if !at_group_start => at_group_start = true,
            _ => return false,
        }
    }

    // A trailing hyphen leaves us at a group start.
    !at_group_start
}

/// Runs all four checks; `None` means the slug is available
///
/// Read-only pre-check. Two racing registrations can both see `None` here;
/// the unique constraint decides the winner at commit.
pub async fn check_slug_availability(
    pool: &PgPool,
    slug: &str,
) -> Result<Option<SlugError>, sqlx::Error> {
    if let Err(reason) = validate_slug_format(slug) {
        return Ok(Some(reason));
    }

    if Account::slug_exists(pool, slug).await? {
        return Ok(Some(SlugError::Taken));
    }

    Ok(None)
}

/// Whether a database error is a violation of the slug unique constraint
pub fn is_slug_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint() == Some(SLUG_CONSTRAINT),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rejected_first() {
        assert_eq!(validate_slug_format(""), Err(SlugError::Empty));
    }

    #[test]
    fn test_pattern_rejections() {
        // Uppercase
        assert_eq!(validate_slug_format("Abc-123"), Err(SlugError::Pattern));
        // Double hyphen
        assert_eq!(validate_slug_format("abc--123"), Err(SlugError::Pattern));
        // Leading / trailing hyphen
        assert_eq!(validate_slug_format("-abc"), Err(SlugError::Pattern));
        assert_eq!(validate_slug_format("abc-"), Err(SlugError::Pattern));
        // Illegal characters
        assert_eq!(validate_slug_format("abc_123"), Err(SlugError::Pattern));
        assert_eq!(validate_slug_format("abc 123"), Err(SlugError::Pattern));
    }

    #[test]
    fn test_pattern_checked_before_length() {
        // Too short AND uppercase: pattern wins because it runs first.
        assert_eq!(validate_slug_format("AB"), Err(SlugError::Pattern));
    }

    #[test]
    fn test_length_rejections() {
        assert_eq!(validate_slug_format("ab"), Err(SlugError::Length));
        let long = "a".repeat(51);
        assert_eq!(validate_slug_format(&long), Err(SlugError::Length));
        // Boundaries are inclusive.
        assert_eq!(validate_slug_format("abc"), Ok(()));
        let max = "a".repeat(50);
        assert_eq!(validate_slug_format(&max), Ok(()));
    }

    #[test]
    fn test_valid_slugs() {
        assert_eq!(validate_slug_format("valid-slug-1"), Ok(()));
        assert_eq!(validate_slug_format("abc123"), Ok(()));
        assert_eq!(validate_slug_format("a-b-c"), Ok(()));
        assert_eq!(validate_slug_format("123"), Ok(()));
    }

    #[test]
    fn test_reason_strings_are_distinct() {
        let reasons = [
            SlugError::Empty.to_string(),
            SlugError::Pattern.to_string(),
            SlugError::Length.to_string(),
            SlugError::Taken.to_string(),
        ];
        for (i, a) in reasons.iter().enumerate() {
            for b in reasons.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
