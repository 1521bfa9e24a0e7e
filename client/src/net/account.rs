//! External account service: the create-session / current-session seam.
//!
//! Client-side (hydrate): Appwrite REST calls via `gloo-net`, carrying the
//! service's session cookie with `credentials: include`.
//! Server-side (SSR) and native tests: every call reports
//! [`AccountError::Unavailable`], since sessions only live in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is returned as a typed [`AccountError`]; nothing panics or
//! throws past this module. The verifier maps these into user-facing text.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "account_test.rs"]
mod account_test;

use async_trait::async_trait;

#[cfg(feature = "hydrate")]
use super::types::{EmailPasswordSessionRequest, ServiceErrorBody};
use super::types::RemoteSession;

/// Header naming the Appwrite project on every request.
pub const PROJECT_HEADER: &str = "X-Appwrite-Project";

/// Failure talking to the account service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    /// The service answered with a non-success status.
    #[error("account service rejected request: status {status}")]
    Rejected { status: u16, message: Option<String> },

    /// The request never produced a response (network, CORS, bad body).
    #[error("account service request failed: {0}")]
    Transport(String),

    /// No browser transport on this target.
    #[error("account service not available on server")]
    Unavailable,
}

impl AccountError {
    /// True when the service reports there is no active session.
    #[must_use]
    pub fn is_missing_session(&self) -> bool {
        matches!(self, Self::Rejected { status: 401, .. })
    }

    /// Text suitable for the user, if the failure carried any.
    #[must_use]
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Transport(reason) => Some(reason.clone()),
            Self::Unavailable => None,
        }
    }
}

/// The two session operations the auth core depends on, plus session
/// invalidation for remote logout.
#[async_trait(?Send)]
pub trait AccountService: Send + Sync {
    async fn create_email_password_session(&self, email: &str, password: &str) -> Result<RemoteSession, AccountError>;

    async fn get_current_session(&self) -> Result<RemoteSession, AccountError>;

    async fn delete_current_session(&self) -> Result<(), AccountError>;
}

/// Appwrite account API client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppwriteAccount {
    endpoint: String,
    project_id: String,
}

impl AppwriteAccount {
    /// `endpoint` is the API root including the version, e.g.
    /// `https://cloud.appwrite.io/v1`.
    #[must_use]
    pub fn new(endpoint: &str, project_id: &str) -> Self {
        Self { endpoint: endpoint.trim_end_matches('/').to_owned(), project_id: project_id.to_owned() }
    }

    fn email_session_url(&self) -> String {
        format!("{}/account/sessions/email", self.endpoint)
    }

    fn account_url(&self) -> String {
        format!("{}/account", self.endpoint)
    }

    fn current_session_url(&self) -> String {
        format!("{}/account/sessions/current", self.endpoint)
    }
}

#[cfg(feature = "hydrate")]
fn transport(err: gloo_net::Error) -> AccountError {
    AccountError::Transport(err.to_string())
}

#[cfg(feature = "hydrate")]
async fn rejection(resp: gloo_net::http::Response) -> AccountError {
    let status = resp.status();
    let message = resp.text().await.ok().and_then(|raw| ServiceErrorBody::message_from(&raw));
    AccountError::Rejected { status, message }
}

#[async_trait(?Send)]
impl AccountService for AppwriteAccount {
    async fn create_email_password_session(&self, email: &str, password: &str) -> Result<RemoteSession, AccountError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::post(&self.email_session_url())
                .header(PROJECT_HEADER, &self.project_id)
                .credentials(web_sys::RequestCredentials::Include)
                .json(&EmailPasswordSessionRequest { email, password })
                .map_err(transport)?
                .send()
                .await
                .map_err(transport)?;
            if !resp.ok() {
                return Err(rejection(resp).await);
            }
            resp.json::<RemoteSession>().await.map_err(transport)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (email, password, self.email_session_url(), &self.project_id);
            Err(AccountError::Unavailable)
        }
    }

    async fn get_current_session(&self) -> Result<RemoteSession, AccountError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::get(&self.account_url())
                .header(PROJECT_HEADER, &self.project_id)
                .credentials(web_sys::RequestCredentials::Include)
                .send()
                .await
                .map_err(transport)?;
            if !resp.ok() {
                return Err(rejection(resp).await);
            }
            resp.json::<RemoteSession>().await.map_err(transport)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = self.account_url();
            Err(AccountError::Unavailable)
        }
    }

    async fn delete_current_session(&self) -> Result<(), AccountError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::delete(&self.current_session_url())
                .header(PROJECT_HEADER, &self.project_id)
                .credentials(web_sys::RequestCredentials::Include)
                .send()
                .await
                .map_err(transport)?;
            if !resp.ok() {
                return Err(rejection(resp).await);
            }
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = self.current_session_url();
            Err(AccountError::Unavailable)
        }
    }
}
