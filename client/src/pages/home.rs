//! Landing page.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use leptos::prelude::*;

use crate::state::auth::AuthStatus;

/// Line under the heading; points anonymous visitors at the sign-in link.
fn home_prompt(authenticated: bool) -> &'static str {
    if authenticated {
        "You are signed in."
    } else {
        "Use the navigation bar to sign in."
    }
}

#[component]
pub fn HomePage(status: RwSignal<AuthStatus>) -> impl IntoView {
    view! {
        <main class="home-page">
            <h1>"Welcome to Potato Admin"</h1>
            <p>{move || home_prompt(status.get().authenticated)}</p>
        </main>
    }
}
