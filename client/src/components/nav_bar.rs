//! Top navigation bar.
//!
//! SYSTEM CONTEXT
//! ==============
//! Link visibility is derived from the published auth status: anonymous
//! visitors get a login link, signed-in visitors a sign-out button.

#[cfg(test)]
#[path = "nav_bar_test.rs"]
mod nav_bar_test;

use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::auth::{Auth, AuthStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavItem {
    Link { label: &'static str, href: &'static str },
    SignOut,
}

/// Entries shown for the given authentication state, in display order.
pub fn nav_items(authenticated: bool) -> Vec<NavItem> {
    let mut items = vec![NavItem::Link { label: "Home", href: "/" }];
    if authenticated {
        items.push(NavItem::SignOut);
    } else {
        items.push(NavItem::Link { label: "Login", href: "/login" });
    }
    items
}

#[component]
pub fn NavBar(auth: Auth, status: RwSignal<AuthStatus>) -> impl IntoView {
    let items = move || {
        nav_items(status.get().authenticated)
            .into_iter()
            .map(|item| match item {
                NavItem::Link { label, href } => view! { <A href=href>{label}</A> }.into_any(),
                NavItem::SignOut => {
                    let auth = auth.clone();
                    view! {
                        <button
                            class="nav-bar__sign-out"
                            type="button"
                            on:click=move |_| {
                                let auth = auth.clone();
                                leptos::task::spawn_local(async move { auth.logout().await });
                            }
                        >
                            "Sign Out"
                        </button>
                    }
                    .into_any()
                }
            })
            .collect_view()
    };

    view! { <nav class="nav-bar">{items}</nav> }
}
