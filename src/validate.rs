//! Advisory validation for the user form.
//!
//! These checks only gate the submit action; the backend stays the authority
//! and may reject what passes here.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("email pattern compiles")
});

/// Reasons a draft cannot be submitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name is required")]
    EmptyName,
    #[error("email is required")]
    EmptyEmail,
    #[error("email address is malformed")]
    MalformedEmail,
}

/// A name is valid when it is non-empty.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
}

/// An email is valid when it is non-empty and has a local-part@domain shape.
pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && EMAIL_RE.is_match(email)
}

/// Check both fields, reporting the first failure.
pub fn validate(name: &str, email: &str) -> Result<(), ValidationError> {
    if !is_valid_name(name) {
        return Err(ValidationError::EmptyName);
    }
    if email.is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    if !is_valid_email(email) {
        return Err(ValidationError::MalformedEmail);
    }
    Ok(())
}
