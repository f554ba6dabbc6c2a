//! Input validation for the login and signup forms.
//!
//! Runs before any request, so a rejected form never reaches the backend.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static LOGIN_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid login email regex"));

static SIGNUP_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("Invalid signup email regex"));

pub const MIN_LOGIN_PASSWORD_LEN: usize = 6;
pub const MIN_LOGIN_ID_LEN: usize = 4;
pub const MIN_SIGNUP_PASSWORD_LEN: usize = 8;
pub const MAX_SIGNUP_PASSWORD_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your email.")]
    EmailMissing,

    #[error("Please enter a valid email address.")]
    EmailFormat,

    #[error("Please enter your password.")]
    PasswordMissing,

    #[error("Password must be at least 6 characters.")]
    PasswordTooShort,

    #[error("Login ID must be at least 4 characters.")]
    LoginIdTooShort,

    #[error("Password must be 8-50 characters using at least three kinds of character.")]
    WeakPassword,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Please enter a {0}.")]
    Required(&'static str),

    #[error("{0}")]
    Incomplete(String),
}

/// Check the login form.
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmailMissing);
    }
    if !LOGIN_EMAIL.is_match(email) {
        return Err(ValidationError::EmailFormat);
    }
    if password.is_empty() {
        return Err(ValidationError::PasswordMissing);
    }
    if password.chars().count() < MIN_LOGIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// A non-empty login id shorter than the minimum.
pub fn is_login_id_too_short(login_id: &str) -> bool {
    let len = login_id.chars().count();
    len > 0 && len < MIN_LOGIN_ID_LEN
}

pub fn is_valid_signup_email(email: &str) -> bool {
    SIGNUP_EMAIL.is_match(email)
}

/// Signup password rules.
///
/// 8 to 50 characters, at least three character classes out of upper case,
/// lower case, digit, and symbol, no character three times in a row, and
/// not containing the login id.
pub fn is_valid_password(password: &str, login_id: &str) -> bool {
    let chars: Vec<char> = password.chars().collect();
    if chars.len() < MIN_SIGNUP_PASSWORD_LEN || chars.len() > MAX_SIGNUP_PASSWORD_LEN {
        return false;
    }

    let classes = [
        chars.iter().any(|c| c.is_ascii_uppercase()),
        chars.iter().any(|c| c.is_ascii_lowercase()),
        chars.iter().any(|c| c.is_ascii_digit()),
        chars.iter().any(|c| !c.is_ascii_alphanumeric()),
    ];
    if classes.iter().filter(|present| **present).count() < 3 {
        return false;
    }

    // The regex crate has no backreferences, so runs are checked by hand.
    if chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2]) {
        return false;
    }

    login_id.is_empty() || !password.contains(login_id)
}

/// Password plus confirmation.
pub fn validate_signup_password(
    password: &str,
    confirm: &str,
    login_id: &str,
) -> Result<(), ValidationError> {
    if !is_valid_password(password, login_id) {
        return Err(ValidationError::WeakPassword);
    }
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}
