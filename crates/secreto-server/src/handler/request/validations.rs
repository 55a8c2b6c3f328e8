//! Request validation utilities.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

/// Usernames are 1 to 64 ASCII letters, digits, underscores, dots or hyphens.
static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]{1,64}$").expect("valid username pattern"));

/// Creates a [`ValidationError`] with a human readable message.
pub fn validation_error(code: &'static str, message: &str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.to_string().into());
    error
}

/// Checks that a username only uses the allowed characters and length.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_REGEX.is_match(username) {
        return Ok(());
    }

    Err(validation_error(
        "username_format",
        "Username must be 1-64 characters of letters, digits, '_', '.' or '-'",
    ))
}

/// Rejects text made only of whitespace.
pub fn validate_not_blank(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(validation_error("blank", "Must not be blank"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_usernames() {
        for username in ["neo", "agent.smith", "the-oracle", "user_42", "A"] {
            assert!(validate_username(username).is_ok(), "{username}");
        }
    }

    #[test]
    fn rejects_invalid_usernames() {
        let too_long = "a".repeat(65);
        for username in ["", "with space", "emoji🙂", "semi;colon", too_long.as_str()] {
            assert!(validate_username(username).is_err(), "{username}");
        }
    }

    #[test]
    fn rejects_blank_text() {
        assert!(validate_not_blank("   \n").is_err());
        assert!(validate_not_blank(" hi ").is_ok());
    }
}
