//! Server configuration parsed from environment variables.
//!
//! Optional:
//! - `BIND_ADDR`: default `0.0.0.0`
//! - `PORT`: default 3000
//!
//! Leptos site options (`site-root`, `site-pkg-dir`, ...) come from
//! `[package.metadata.leptos]` and may be overridden with `LEPTOS_*`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::ServerError;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: DEFAULT_BIND_ADDR, port: DEFAULT_PORT }
    }
}

impl ServerConfig {
    /// Build config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] when a set value does not parse.
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary lookup. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] when a set value does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let bind_addr = match get("BIND_ADDR") {
            Some(raw) => raw.parse().map_err(|_| ServerError::Config(format!("invalid BIND_ADDR: {raw}")))?,
            None => DEFAULT_BIND_ADDR,
        };
        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ServerError::Config(format!("invalid PORT: {raw}")))?,
            None => DEFAULT_PORT,
        };

        Ok(Self { bind_addr, port })
    }

    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
