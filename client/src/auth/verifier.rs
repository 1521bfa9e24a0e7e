//! Credential verifier strategies.
//!
//! SYSTEM CONTEXT
//! ==============
//! The facade holds one `Arc<dyn CredentialVerifier>` chosen at startup:
//! either the constant-credential [`LocalVerifier`] or the account-service
//! backed [`RemoteVerifier`]. Futures are `?Send` because browser fetches are
//! single-threaded.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "verifier_test.rs"]
mod verifier_test;

use std::fmt;

use async_trait::async_trait;

use super::error::{AuthError, ValidationError};
use super::validation::SigninForm;
use crate::net::account::AccountService;

pub const LOCAL_USERNAME: &str = "user";
pub const LOCAL_PASSWORD: &str = "password";

/// One login attempt's input. Never persisted or logged.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub identifier: String,
    pub secret: String,
}

impl Credentials {
    #[must_use]
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self { identifier: identifier.into(), secret: secret.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").field("identifier", &"<redacted>").field("secret", &"<redacted>").finish()
    }
}

/// What the login form should ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentifierKind {
    Username,
    Email,
}

/// Outcome of asking the verifier whether a session is already live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionCheck {
    /// The service confirms a live session.
    Active,
    /// The service says there is no session.
    Absent,
    /// The service could not be asked; the reason is for logs only.
    Unknown(String),
    /// This strategy has no notion of a remote session.
    Unsupported,
}

#[async_trait(?Send)]
pub trait CredentialVerifier: Send + Sync {
    fn identifier_kind(&self) -> IdentifierKind;

    /// Local input checks run before [`verify`](Self::verify).
    ///
    /// # Errors
    ///
    /// Returns field-level messages when the input is malformed.
    fn validate(&self, credentials: &Credentials) -> Result<(), ValidationError> {
        let _ = credentials;
        Ok(())
    }

    async fn verify(&self, credentials: &Credentials) -> Result<(), AuthError>;

    async fn current_session(&self) -> SessionCheck {
        SessionCheck::Unsupported
    }

    /// Invalidate the server-side session, if the strategy has one.
    async fn end_session(&self) -> Result<(), AuthError> {
        Ok(())
    }
}

/// Hardcoded single-account check. No I/O.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalVerifier;

#[async_trait(?Send)]
impl CredentialVerifier for LocalVerifier {
    fn identifier_kind(&self) -> IdentifierKind {
        IdentifierKind::Username
    }

    async fn verify(&self, credentials: &Credentials) -> Result<(), AuthError> {
        if credentials.identifier == LOCAL_USERNAME && credentials.secret == LOCAL_PASSWORD {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Delegates to an external account service.
pub struct RemoteVerifier<A> {
    account: A,
}

impl<A: AccountService> RemoteVerifier<A> {
    pub fn new(account: A) -> Self {
        Self { account }
    }
}

#[async_trait(?Send)]
impl<A: AccountService> CredentialVerifier for RemoteVerifier<A> {
    fn identifier_kind(&self) -> IdentifierKind {
        IdentifierKind::Email
    }

    fn validate(&self, credentials: &Credentials) -> Result<(), ValidationError> {
        SigninForm::parse(&credentials.identifier, &credentials.secret).map(|_| ())
    }

    async fn verify(&self, credentials: &Credentials) -> Result<(), AuthError> {
        match self
            .account
            .create_email_password_session(credentials.identifier.trim(), &credentials.secret)
            .await
        {
            Ok(session) => {
                log::debug!("account session created (id_len={})", session.id.len());
                Ok(())
            }
            Err(err) => {
                log::info!("account service refused session: {err}");
                Err(AuthError::remote(err.user_message()))
            }
        }
    }

    async fn current_session(&self) -> SessionCheck {
        match self.account.get_current_session().await {
            Ok(_) => SessionCheck::Active,
            Err(err) if err.is_missing_session() => SessionCheck::Absent,
            Err(err) => SessionCheck::Unknown(err.to_string()),
        }
    }

    async fn end_session(&self) -> Result<(), AuthError> {
        self.account.delete_current_session().await.map_err(|err| AuthError::remote(err.user_message()))
    }
}
