//! Server startup errors.

/// Errors that stop the server from starting or serving.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// An environment value could not be parsed.
    #[error("config parse failed: {0}")]
    Config(String),

    /// `[package.metadata.leptos]` or `LEPTOS_*` settings are missing or malformed.
    #[error("leptos configuration: {0}")]
    Leptos(String),

    /// The listener could not bind.
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: String, source: std::io::Error },

    /// The server loop exited with an I/O error.
    #[error("server failed: {0}")]
    Serve(#[from] std::io::Error),
}
