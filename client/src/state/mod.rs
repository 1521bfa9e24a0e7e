//! Client-side state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` holds the persisted authenticated flag; `auth` is the facade
//! that owns it and is the only surface views see.

pub mod auth;
pub mod session;
