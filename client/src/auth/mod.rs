//! Credential checking: input validation, verifier strategies, error types.
//!
//! SYSTEM CONTEXT
//! ==============
//! Everything here is consumed by the auth facade in `state::auth`. Errors
//! from the account service stop at the verifier boundary and leave it as
//! `AuthError`, so nothing from the transport reaches the views.

pub mod error;
pub mod validation;
pub mod verifier;
