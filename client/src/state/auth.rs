//! Auth facade: the only way views read or change authentication status.
//!
//! SYSTEM CONTEXT
//! ==============
//! Built once by the application root and handed to each view that needs it.
//! It wires the verifier's verdict into the session store and republishes
//! the combined [`AuthStatus`] to subscribers after every change.
//!
//! CONCURRENCY
//! ===========
//! Overlapping attempts resolve latest-issued-wins: each login takes a ticket
//! when it starts, and a result whose ticket is no longer the newest is
//! dropped. Logout advances the ticket too, so a slow login can never undo it.
//! A session check takes no ticket; it is dropped if any attempt started or
//! any transition was applied while it was in flight.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::auth::error::FieldErrors;
use crate::auth::verifier::{CredentialVerifier, Credentials, IdentifierKind, SessionCheck};
use crate::state::session::SessionStore;
use crate::util::observers::{Observers, Subscription};

/// Snapshot published to views.
///
/// `authenticated` implies `error.is_none()`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthStatus {
    pub authenticated: bool,
    /// Verifier rejection from the last attempt.
    pub error: Option<String>,
    /// Local validation failures from the last attempt.
    pub field_errors: FieldErrors,
}

/// Whether logout also invalidates the account service's session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogoutMode {
    /// Clear local state only; the service session expires on its own.
    #[default]
    LocalOnly,
    /// Clear local state, then ask the verifier to end the remote session.
    InvalidateRemote,
}

#[derive(Default)]
struct Messages {
    error: Option<String>,
    field_errors: FieldErrors,
}

struct Inner {
    store: SessionStore,
    verifier: Arc<dyn CredentialVerifier>,
    logout_mode: LogoutMode,
    messages: Mutex<Messages>,
    latest_attempt: AtomicU64,
    /// Bumped by every applied transition.
    generation: AtomicU64,
    observers: Observers<AuthStatus>,
}

/// Cheap to clone; clones share one state.
#[derive(Clone)]
pub struct Auth {
    inner: Arc<Inner>,
}

impl Auth {
    pub fn new(store: SessionStore, verifier: Arc<dyn CredentialVerifier>, logout_mode: LogoutMode) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                verifier,
                logout_mode,
                messages: Mutex::new(Messages::default()),
                latest_attempt: AtomicU64::new(0),
                generation: AtomicU64::new(0),
                observers: Observers::new(),
            }),
        }
    }

    #[must_use]
    pub fn status(&self) -> AuthStatus {
        let messages = self.messages();
        AuthStatus {
            authenticated: self.inner.store.get(),
            error: messages.error.clone(),
            field_errors: messages.field_errors.clone(),
        }
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.inner.store.get()
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.messages().error.clone()
    }

    #[must_use]
    pub fn identifier_kind(&self) -> IdentifierKind {
        self.inner.verifier.identifier_kind()
    }

    /// Receive every status change until the handle is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&AuthStatus) + Send + Sync + 'static,
    {
        self.inner.observers.subscribe(listener)
    }

    /// Attempt to sign in. Returns `true` only if this attempt authenticated
    /// the session.
    ///
    /// Validation failures publish field errors and leave the authenticated
    /// flag untouched. Verifier rejections leave the session anonymous with
    /// the rejection message as the current error.
    pub async fn login(&self, identifier: &str, secret: &str) -> bool {
        let ticket = self.inner.latest_attempt.fetch_add(1, Ordering::SeqCst) + 1;
        let credentials = Credentials::new(identifier, secret);

        if let Err(err) = self.inner.verifier.validate(&credentials) {
            log::debug!("login attempt {ticket} failed validation: {err}");
            let authenticated = self.inner.store.get();
            self.transition(authenticated, None, err.fields);
            return false;
        }

        log::debug!("login attempt {ticket} submitted");
        let verdict = self.inner.verifier.verify(&credentials).await;

        if !self.is_latest(ticket) {
            log::debug!("login attempt {ticket} superseded; result dropped");
            return false;
        }

        match verdict {
            Ok(()) => {
                log::info!("login attempt {ticket} succeeded");
                self.transition(true, None, FieldErrors::new());
                true
            }
            Err(err) => {
                log::info!("login attempt {ticket} rejected");
                self.transition(false, Some(err.to_string()), FieldErrors::new());
                false
            }
        }
    }

    /// Sign out. Local state is cleared before anything is awaited, so no
    /// remote failure can keep the session alive locally.
    pub async fn logout(&self) {
        self.inner.latest_attempt.fetch_add(1, Ordering::SeqCst);
        self.transition(false, None, FieldErrors::new());
        log::info!("signed out");

        if self.inner.logout_mode == LogoutMode::InvalidateRemote {
            if let Err(err) = self.inner.verifier.end_session().await {
                log::warn!("remote session invalidation failed: {err}");
            }
        }
    }

    /// Reconcile the persisted flag against the verifier's live session.
    ///
    /// A live session authenticates without a password; a definite "no
    /// session" decays to anonymous; anything else keeps the persisted flag.
    /// Returns the resulting authenticated flag.
    ///
    /// The verdict is discarded if a login or logout started or finished
    /// while the check was pending; their result is newer than the check.
    pub async fn restore_session(&self) -> bool {
        let ticket = self.inner.latest_attempt.load(Ordering::SeqCst);
        let generation = self.inner.generation.load(Ordering::SeqCst);
        let check = self.inner.verifier.current_session().await;

        if !self.is_latest(ticket) || self.inner.generation.load(Ordering::SeqCst) != generation {
            log::debug!("session check superseded by a newer attempt");
            return self.is_logged_in();
        }

        match check {
            SessionCheck::Active => {
                log::info!("existing session restored");
                self.transition(true, None, FieldErrors::new());
            }
            SessionCheck::Absent => {
                if self.inner.store.get() {
                    log::info!("persisted login has no live session; signing out locally");
                }
                let messages = self.messages();
                let (error, field_errors) = (messages.error.clone(), messages.field_errors.clone());
                drop(messages);
                self.transition(false, error, field_errors);
            }
            SessionCheck::Unknown(reason) => {
                log::warn!("session check failed, keeping persisted state: {reason}");
            }
            SessionCheck::Unsupported => {}
        }
        self.is_logged_in()
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.inner.latest_attempt.load(Ordering::SeqCst) == ticket
    }

    fn messages(&self) -> std::sync::MutexGuard<'_, Messages> {
        self.inner.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a new state and publish it if anything changed.
    ///
    /// Writes are ordered so the error is never visible next to a true flag.
    fn transition(&self, authenticated: bool, error: Option<String>, field_errors: FieldErrors) {
        let before = self.status();
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        if authenticated {
            self.replace_messages(error, field_errors);
            self.inner.store.set(true);
        } else {
            self.inner.store.set(false);
            self.replace_messages(error, field_errors);
        }
        let after = self.status();
        if after != before {
            self.inner.observers.notify(&after);
        }
    }

    fn replace_messages(&self, error: Option<String>, field_errors: FieldErrors) {
        let mut messages = self.messages();
        messages.error = error;
        messages.field_errors = field_errors;
    }
}
