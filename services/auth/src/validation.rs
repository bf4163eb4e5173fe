//! Registration input validation

use regex::Regex;
use std::sync::OnceLock;

use crate::models::RegisterRequest;

/// Validate every field of a registration request
pub fn validate_registration(payload: &RegisterRequest) -> Result<(), String> {
    validate_username(&payload.username)?;
    validate_email(&payload.email)?;
    validate_password(&payload.password)
}

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if !(3..=32).contains(&username.chars().count()) {
        return Err("Username must be between 3 and 32 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err("Username can only contain letters, numbers, and underscores".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if !(8..=128).contains(&password.chars().count()) {
        return Err("Password must be between 8 and 128 characters long".to_string());
    }

    let rules: [(fn(char) -> bool, &str); 4] = [
        (|c| c.is_ascii_uppercase(), "an uppercase letter"),
        (|c| c.is_ascii_lowercase(), "a lowercase letter"),
        (|c| c.is_ascii_digit(), "a digit"),
        (|c| !c.is_alphanumeric(), "a special character"),
    ];

    for (rule, what) in rules {
        if !password.chars().any(rule) {
            return Err(format!("Password must contain at least {}", what));
        }
    }

    Ok(())
}
