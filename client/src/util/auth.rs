//! Bridge from the auth facade to Leptos reactivity.
//!
//! SYSTEM CONTEXT
//! ==============
//! Views never subscribe to the facade themselves: the application root calls
//! [`status_signal`] once and hands the signal down with the facade.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;

use crate::state::auth::{Auth, AuthStatus};

/// Mirror the facade's status into a signal for the current owner's lifetime.
///
/// The signal starts anonymous so the server render and the first client
/// render agree; the persisted flag is applied once hydrated.
pub fn status_signal(auth: &Auth) -> RwSignal<AuthStatus> {
    let status = RwSignal::new(AuthStatus::default());

    let seed = auth.clone();
    Effect::new(move |_| status.set(seed.status()));

    let subscription = auth.subscribe(move |next| status.set(next.clone()));
    on_cleanup(move || drop(subscription));

    status
}

/// The login page leaves for `/` once the session is authenticated.
pub fn should_leave_login(status: &AuthStatus) -> bool {
    status.authenticated
}
