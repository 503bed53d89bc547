//! Input validation for account fields

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{CoreError, CoreResult};

/// Validate a username: 3 to 20 characters of `[a-z0-9_-]`. The check
/// lowercases first; callers normalize the stored value the same way.
pub fn validate_username(username: &str) -> CoreResult<()> {
    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-z0-9_-]{3,20}$").expect("Failed to compile username regex"));

    if !regex.is_match(&username.to_lowercase()) {
        return Err(CoreError::Validation("username not valid".to_string()));
    }

    Ok(())
}

/// Validate an email address shape.
pub fn validate_email(email: &str) -> CoreResult<()> {
    if email.is_empty() || email.len() > 254 {
        return Err(CoreError::Validation(
            "email address not accepted".to_string(),
        ));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(CoreError::Validation(
            "email address not accepted".to_string(),
        ));
    }

    Ok(())
}

/// Validate a chosen password. Presently only the length (8+) is
/// checked.
pub fn validate_password(password: &str) -> CoreResult<()> {
    if password.len() < 8 {
        return Err(CoreError::WeakPassword);
    }

    Ok(())
}
