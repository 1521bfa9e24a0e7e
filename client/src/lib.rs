//! # client
//!
//! Leptos + WASM frontend for the Potato admin portal: home page, navigation
//! bar and login form over a small client-side auth core.
//!
//! The auth core is `state::session` (persisted flag), `auth` (validation and
//! verifier strategies), `net::account` (external account service) and
//! `state::auth` (the facade every view goes through).

pub mod app;
pub mod auth;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_support;

/// Browser entry point: install logging and hydrate the server render.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
