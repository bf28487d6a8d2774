// ── Form validation ──
//
// Rules applied before anything is sent to the backend. Lengths count
// characters, not bytes.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

pub const PASSWORD_MIN: usize = 6;
pub const PASSWORD_MAX: usize = 15;
pub const USERNAME_MIN: usize = 2;
pub const CITY_NAME_MIN: usize = 3;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Six digits, no leading zero, optional space after the third.
static PINCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]{2}\s?[0-9]{3}$").expect("pincode pattern compiles"));

pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

pub fn is_pincode(value: &str) -> bool {
    PINCODE.is_match(value)
}

fn validate_password(password: &str) -> Result<(), CoreError> {
    let len = password.chars().count();
    if len < PASSWORD_MIN {
        return Err(CoreError::validation(
            "password",
            format!("Password must be at least {PASSWORD_MIN} characters"),
        ));
    }
    if len > PASSWORD_MAX {
        return Err(CoreError::validation(
            "password",
            format!("Password can not have more than {PASSWORD_MAX} characters"),
        ));
    }
    Ok(())
}

/// Sign-in form: a username of at least two characters or an email, and a
/// password within bounds.
pub fn validate_sign_in(identifier: &str, password: &str) -> Result<(), CoreError> {
    let identifier = identifier.trim();
    if identifier.chars().count() < USERNAME_MIN && !is_email(identifier) {
        return Err(CoreError::validation(
            "identifier",
            format!("Username must be at least {USERNAME_MIN} characters."),
        ));
    }
    validate_password(password)
}

/// Sign-up form.
pub fn validate_sign_up(username: &str, email: &str, password: &str) -> Result<(), CoreError> {
    if username.trim().chars().count() < USERNAME_MIN {
        return Err(CoreError::validation(
            "username",
            format!("Username must be at least {USERNAME_MIN} characters."),
        ));
    }
    if !is_email(email.trim()) {
        return Err(CoreError::validation("email", "invalid email address"));
    }
    validate_password(password)
}

pub fn validate_city(name: &str, pincode: &str) -> Result<(), CoreError> {
    if name.trim().chars().count() < CITY_NAME_MIN {
        return Err(CoreError::validation(
            "name",
            "City name should have at least three characters",
        ));
    }
    if !is_pincode(pincode.trim()) {
        return Err(CoreError::validation("pincode", "Invalid pincode"));
    }
    Ok(())
}

pub fn validate_state(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::validation("name", "State name is required"));
    }
    Ok(())
}
