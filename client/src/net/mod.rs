//! Networking modules for the external account service.
//!
//! SYSTEM CONTEXT
//! ==============
//! `account` owns the REST calls and their error type, `types` the wire DTOs.

pub mod account;
pub mod types;
