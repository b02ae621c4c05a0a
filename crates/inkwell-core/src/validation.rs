//! Input validation rules shared by the server and the client forms.

use regex::Regex;
use std::sync::OnceLock;

pub const TITLE_MAX_CHARS: usize = 200;
pub const EXCERPT_MAX_CHARS: usize = 300;
pub const USERNAME_MAX_CHARS: usize = 32;
pub const PASSWORD_MIN_CHARS: usize = 6;

/// Loose email shape check: something, `@`, something, `.`, something.
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL_REGEX
        .get_or_init(|| Regex::new(r"\S+@\S+\.\S+").ok())
        .as_ref()
        .is_some_and(|regex| regex.is_match(email))
}

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    let username = username.trim();
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.chars().count() > USERNAME_MAX_CHARS {
        return Err(format!(
            "Username must be at most {} characters",
            USERNAME_MAX_CHARS
        ));
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if !is_valid_email(email) {
        return Err("Email is invalid".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN_CHARS
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a@b.c"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada example.com"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn test_validate_email_messages() {
        assert_eq!(validate_email("  ").unwrap_err(), "Email is required");
        assert_eq!(validate_email("nope").unwrap_err(), "Email is invalid");
        assert!(validate_email(" ada@example.com ").is_ok());
    }

    #[test]
    fn test_password_length() {
        assert_eq!(validate_password("").unwrap_err(), "Password is required");
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn test_username() {
        assert!(validate_username("   ").is_err());
        assert!(validate_username(&"x".repeat(USERNAME_MAX_CHARS + 1)).is_err());
        assert!(validate_username("ada").is_ok());
    }
}
