//! Build-time auth configuration.
//!
//! Values are baked in with `option_env!` when the WASM bundle is compiled.
//! They are public; never put secrets here.
//!
//! - `AUTH_STRATEGY`: `local` (default) or `appwrite`
//! - `APPWRITE_ENDPOINT`: API root, e.g. `https://cloud.appwrite.io/v1` (appwrite only)
//! - `APPWRITE_PROJECT_ID`: project id (appwrite only)
//! - `AUTH_LOGOUT_MODE`: `local` (default) or `remote`

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::sync::Arc;

use crate::auth::verifier::{CredentialVerifier, LocalVerifier, RemoteVerifier};
use crate::net::account::AppwriteAccount;
use crate::state::auth::LogoutMode;

/// Errors from parsing auth configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown AUTH_STRATEGY: {0}")]
    UnknownStrategy(String),

    #[error("unknown AUTH_LOGOUT_MODE: {0}")]
    UnknownLogoutMode(String),

    #[error("{var} is required when AUTH_STRATEGY=appwrite")]
    Missing { var: &'static str },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Constant-credential check.
    Local,
    /// Appwrite account service.
    Appwrite { endpoint: String, project_id: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthConfig {
    pub strategy: Strategy,
    pub logout_mode: LogoutMode,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { strategy: Strategy::Local, logout_mode: LogoutMode::LocalOnly }
    }
}

impl AuthConfig {
    /// Read the values baked in at compile time.
    ///
    /// # Errors
    ///
    /// See [`AuthConfig::from_lookup`].
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            let value = match key {
                "AUTH_STRATEGY" => option_env!("AUTH_STRATEGY"),
                "APPWRITE_ENDPOINT" => option_env!("APPWRITE_ENDPOINT"),
                "APPWRITE_PROJECT_ID" => option_env!("APPWRITE_PROJECT_ID"),
                "AUTH_LOGOUT_MODE" => option_env!("AUTH_LOGOUT_MODE"),
                _ => None,
            };
            value.map(str::to_owned)
        })
    }

    /// Parse configuration from an arbitrary key lookup. Blank values count
    /// as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for unknown enum values, or when the appwrite
    /// strategy is selected without an endpoint or project id.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let strategy = match get("AUTH_STRATEGY").map(|v| v.to_ascii_lowercase()).as_deref() {
            None | Some("local") => Strategy::Local,
            Some("appwrite") => Strategy::Appwrite {
                endpoint: get("APPWRITE_ENDPOINT")
                    .ok_or(ConfigError::Missing { var: "APPWRITE_ENDPOINT" })?
                    .trim_end_matches('/')
                    .to_owned(),
                project_id: get("APPWRITE_PROJECT_ID").ok_or(ConfigError::Missing { var: "APPWRITE_PROJECT_ID" })?,
            },
            Some(other) => return Err(ConfigError::UnknownStrategy(other.to_owned())),
        };

        let logout_mode = match get("AUTH_LOGOUT_MODE").map(|v| v.to_ascii_lowercase()).as_deref() {
            None | Some("local") => LogoutMode::LocalOnly,
            Some("remote") => LogoutMode::InvalidateRemote,
            Some(other) => return Err(ConfigError::UnknownLogoutMode(other.to_owned())),
        };

        Ok(Self { strategy, logout_mode })
    }

    /// Build the verifier this configuration selects.
    #[must_use]
    pub fn verifier(&self) -> Arc<dyn CredentialVerifier> {
        match &self.strategy {
            Strategy::Local => Arc::new(LocalVerifier),
            Strategy::Appwrite { endpoint, project_id } => {
                Arc::new(RemoteVerifier::new(AppwriteAccount::new(endpoint, project_id)))
            }
        }
    }
}
