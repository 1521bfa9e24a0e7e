//! Error kinds produced while signing in.

use std::collections::BTreeMap;

/// Field name -> human-readable messages, ordered for stable rendering.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Message shown when the local constant check rejects the credentials.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password.";

/// Fallback when the account service rejects without a message.
pub const REMOTE_FALLBACK_MESSAGE: &str = "Invalid email or password";

/// Verifier rejection, shown verbatim to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Local strategy did not recognize the credentials.
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    /// Account service rejection or transport failure.
    #[error("{0}")]
    Remote(String),
}

impl AuthError {
    /// Build a remote error, substituting the generic message for a missing
    /// or blank one.
    #[must_use]
    pub fn remote(message: Option<String>) -> Self {
        match message {
            Some(m) if !m.trim().is_empty() => Self::Remote(m),
            _ => Self::Remote(REMOTE_FALLBACK_MESSAGE.to_owned()),
        }
    }
}

/// Locally malformed input. Never reaches a verifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid input in {}", .fields.keys().cloned().collect::<Vec<_>>().join(", "))]
pub struct ValidationError {
    pub fields: FieldErrors,
}

impl ValidationError {
    #[must_use]
    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}
