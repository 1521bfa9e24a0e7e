//! Fallback for unknown routes.

use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <main class="not-found-page">
            <h1>"Page not found"</h1>
            <A href="/">"Back home"</A>
        </main>
    }
}
