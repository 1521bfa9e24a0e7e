//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components receive the auth facade and its status signal as props from
//! the application root rather than from context providers.

pub mod nav_bar;
