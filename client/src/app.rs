//! Root application component with routing and the auth facade.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::nav_bar::NavBar;
use crate::config::AuthConfig;
use crate::pages::{home::HomePage, login::LoginPage, not_found::NotFoundPage};
use crate::state::auth::Auth;
use crate::state::session::SessionStore;
use crate::util::auth::status_signal;
use crate::util::storage::BrowserStorage;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Build the process-wide facade from build-time configuration.
fn build_auth() -> Auth {
    let config = AuthConfig::from_build_env().unwrap_or_else(|err| {
        log::error!("invalid auth configuration, using local strategy: {err}");
        AuthConfig::default()
    });
    let store = SessionStore::load(Arc::new(BrowserStorage));
    Auth::new(store, config.verifier(), config.logout_mode)
}

/// Root application component.
///
/// Owns the single [`Auth`] instance and passes it to each view that needs
/// it; nothing reaches it through ambient context.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = build_auth();
    let status = status_signal(&auth);
    let nav_auth = auth.clone();

    view! {
        <Stylesheet id="leptos" href="/pkg/potato-admin.css"/>
        <Title text="Potato Admin"/>

        <Router>
            <NavBar auth=nav_auth status=status/>
            <hr/>
            <Routes fallback=NotFoundPage>
                <Route path=StaticSegment("") view=move || view! { <HomePage status=status/> }/>
                <Route
                    path=StaticSegment("login")
                    view=move || view! { <LoginPage auth=auth.clone() status=status/> }
                />
            </Routes>
        </Router>
    }
}
