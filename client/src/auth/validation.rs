//! Local sign-in validation for the account-service strategy.
//!
//! Runs before any request so malformed input never costs a round trip.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

use super::error::{FieldErrors, ValidationError};

pub const FIELD_IDENTIFIER: &str = "identifier";
pub const FIELD_SECRET: &str = "secret";

pub const SECRET_MIN_CHARS: usize = 8;
pub const SECRET_MAX_CHARS: usize = 255;

const INVALID_EMAIL: &str = "Invalid email";
const SECRET_TOO_SHORT: &str = "Password must be at least 8 characters";
const SECRET_TOO_LONG: &str = "Password must be at most 255 characters";

/// Email + password that passed local validation.
#[derive(Clone, PartialEq, Eq)]
pub struct SigninForm {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SigninForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigninForm").field("email", &self.email).field("password", &"<redacted>").finish()
    }
}

impl SigninForm {
    /// Validate both fields and report every failure at once.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] keyed by [`FIELD_IDENTIFIER`] and/or
    /// [`FIELD_SECRET`] when either field is malformed.
    pub fn parse(identifier: &str, secret: &str) -> Result<Self, ValidationError> {
        let mut fields = FieldErrors::new();

        let email = identifier.trim();
        if !is_email(email) {
            fields.entry(FIELD_IDENTIFIER.to_owned()).or_default().push(INVALID_EMAIL.to_owned());
        }

        let secret_chars = secret.chars().count();
        if secret_chars < SECRET_MIN_CHARS {
            fields.entry(FIELD_SECRET.to_owned()).or_default().push(SECRET_TOO_SHORT.to_owned());
        } else if secret_chars > SECRET_MAX_CHARS {
            fields.entry(FIELD_SECRET.to_owned()).or_default().push(SECRET_TOO_LONG.to_owned());
        }

        if fields.is_empty() {
            Ok(Self { email: email.to_owned(), password: secret.to_owned() })
        } else {
            Err(ValidationError { fields })
        }
    }
}

/// Structural email check: one `@`, non-empty local part, dotted domain with
/// no empty labels, no whitespace.
#[must_use]
pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| !label.is_empty() && !label.starts_with('-') && !label.ends_with('-'))
}
