//! Login page: credential form plus existing-session check.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::auth::validation::{FIELD_IDENTIFIER, FIELD_SECRET};
use crate::auth::verifier::IdentifierKind;
use crate::state::auth::{Auth, AuthStatus};
use crate::util::auth::should_leave_login;

/// Row key used for the verifier's rejection message.
const FORM_ROW: &str = "form";

fn identifier_label(kind: IdentifierKind) -> &'static str {
    match kind {
        IdentifierKind::Username => "Username",
        IdentifierKind::Email => "Email",
    }
}

fn identifier_input_type(kind: IdentifierKind) -> &'static str {
    match kind {
        IdentifierKind::Username => "text",
        IdentifierKind::Email => "email",
    }
}

fn identifier_placeholder(kind: IdentifierKind) -> &'static str {
    match kind {
        IdentifierKind::Username => "user",
        IdentifierKind::Email => "me@example.com",
    }
}

/// Error rows to render, field errors first (ordered by field), then the
/// verifier's message under `form`.
pub fn error_rows(status: &AuthStatus, kind: IdentifierKind) -> Vec<(String, Vec<String>)> {
    let mut rows: Vec<(String, Vec<String>)> = status
        .field_errors
        .iter()
        .map(|(field, messages)| {
            let label = match field.as_str() {
                FIELD_IDENTIFIER => identifier_label(kind).to_owned(),
                FIELD_SECRET => "Password".to_owned(),
                other => other.to_owned(),
            };
            (label, messages.clone())
        })
        .collect();
    if let Some(error) = &status.error {
        rows.push((FORM_ROW.to_owned(), vec![error.clone()]));
    }
    rows
}

#[component]
pub fn LoginPage(auth: Auth, status: RwSignal<AuthStatus>) -> impl IntoView {
    let identifier = RwSignal::new(String::new());
    let secret = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let navigate = use_navigate();
    let kind = auth.identifier_kind();

    // Someone with a live session never needs the form.
    {
        let auth = auth.clone();
        let navigate = navigate.clone();
        Effect::new(move |_| {
            let auth = auth.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                if auth.restore_session().await && should_leave_login(&auth.status()) {
                    navigate("/", NavigateOptions::default());
                }
            });
        });
    }

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        busy.set(true);
        let auth = auth.clone();
        let navigate = navigate.clone();
        let identifier_value = identifier.get_untracked();
        let secret_value = secret.get_untracked();
        leptos::task::spawn_local(async move {
            let signed_in = auth.login(&identifier_value, &secret_value).await;
            busy.set(false);
            if signed_in {
                secret.set(String::new());
                navigate("/", NavigateOptions::default());
            }
        });
    };

    let errors = move || {
        error_rows(&status.get(), kind)
            .into_iter()
            .map(|(label, messages)| {
                view! {
                    <div class="login-errors__row">
                        <strong>{label}":"</strong>
                        <ul>{messages.into_iter().map(|message| view! { <li>{message}</li> }).collect_view()}</ul>
                    </div>
                }
            })
            .collect_view()
    };

    view! {
        <main class="login-page">
            <h1>"Sign in"</h1>
            <form class="login-form" on:submit=on_submit>
                <label for="identifier">{identifier_label(kind)}</label>
                <input
                    id="identifier"
                    name="identifier"
                    type=identifier_input_type(kind)
                    placeholder=identifier_placeholder(kind)
                    autocomplete="username"
                    prop:value=move || identifier.get()
                    on:input=move |ev| identifier.set(event_target_value(&ev))
                />
                <label for="secret">"Password"</label>
                <input
                    id="secret"
                    name="secret"
                    type="password"
                    autocomplete="current-password"
                    prop:value=move || secret.get()
                    on:input=move |ev| secret.set(event_target_value(&ev))
                />
                <button class="login-button" type="submit" disabled=move || busy.get()>
                    "Login"
                </button>
            </form>
            <div class="login-errors">{errors}</div>
        </main>
    }
}
