//! Page title and body validation.

use crate::error::CoreError;

/// Maximum page title length in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum page body length in bytes.
pub const MAX_BODY_LEN: usize = 100_000;

/// Maximum edit summary length in characters.
pub const MAX_SUMMARY_LEN: usize = 500;

/// Validate a page title (non-empty, <= 200 chars).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate page body content (max 100 000 bytes).
pub fn validate_body(body: &str) -> Result<(), CoreError> {
    if body.len() > MAX_BODY_LEN {
        return Err(CoreError::Validation(format!(
            "Body must be at most {MAX_BODY_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate an optional edit summary.
pub fn validate_summary(summary: Option<&str>) -> Result<(), CoreError> {
    if summary.is_some_and(|s| s.chars().count() > MAX_SUMMARY_LEN) {
        return Err(CoreError::Validation(format!(
            "Summary must be at most {MAX_SUMMARY_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_valid() {
        assert!(validate_title("My Page").is_ok());
    }

    #[test]
    fn title_empty_rejected() {
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
    }

    #[test]
    fn title_too_long_rejected() {
        let long = "a".repeat(MAX_TITLE_LEN + 1);
        assert!(validate_title(&long).is_err());
    }

    #[test]
    fn body_limits() {
        assert!(validate_body("").is_ok());
        assert!(validate_body(&"x".repeat(MAX_BODY_LEN + 1)).is_err());
    }

    #[test]
    fn summary_limits() {
        assert!(validate_summary(None).is_ok());
        assert!(validate_summary(Some("fixed typo")).is_ok());
        assert!(validate_summary(Some(&"s".repeat(MAX_SUMMARY_LEN + 1))).is_err());
    }
}
