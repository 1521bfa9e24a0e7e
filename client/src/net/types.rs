//! Wire DTOs for the external account service.
//!
//! DESIGN
//! ======
//! Only the fields the client relies on are modelled. Session tokens stay in
//! the service's own cookie; `RemoteSession` carries nothing beyond an id.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Opaque session (or account) handle returned by the account service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RemoteSession {
    #[serde(rename = "$id", default)]
    pub id: String,
}

/// Body of `POST /account/sessions/email`.
#[derive(Serialize)]
pub struct EmailPasswordSessionRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Error body returned by the account service on non-2xx responses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ServiceErrorBody {
    /// Extract the message from a raw response body, if it is the service's
    /// JSON error shape and the message is non-blank.
    #[must_use]
    pub fn message_from(raw: &str) -> Option<String> {
        serde_json::from_str::<Self>(raw)
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.trim().is_empty())
    }
}
