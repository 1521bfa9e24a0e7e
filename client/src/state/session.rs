//! Session state store: the single persisted "is authenticated" flag.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owned by the auth facade; views never reach it directly. The persisted
//! value only seeds the first render after a reload. It is advisory and is
//! never treated as proof of a live session.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex, PoisonError};

use crate::util::observers::{Observers, Subscription};
use crate::util::storage::KeyValueStore;

/// `localStorage` key holding `"true"` or `"false"`.
pub const STORAGE_KEY: &str = "isLoggedIn";

struct Inner {
    storage: Arc<dyn KeyValueStore>,
    authenticated: Mutex<bool>,
    observers: Observers<bool>,
}

/// Holder of the authenticated flag. Clones share state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Build a store seeded from `storage`. Anything other than the literal
    /// `"true"` (including an absent key) reads as unauthenticated.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let authenticated = parse_flag(storage.get(STORAGE_KEY).as_deref());
        log::debug!("session store loaded (authenticated={authenticated})");
        Self {
            inner: Arc::new(Inner { storage, authenticated: Mutex::new(authenticated), observers: Observers::new() }),
        }
    }

    #[must_use]
    pub fn get(&self) -> bool {
        *self.inner.authenticated.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Overwrite and persist the flag. Subscribers hear about actual changes
    /// only, so repeated writes of the same value are observably one write.
    pub fn set(&self, authenticated: bool) {
        let changed = {
            let mut current = self.inner.authenticated.lock().unwrap_or_else(PoisonError::into_inner);
            let changed = *current != authenticated;
            *current = authenticated;
            changed
        };
        self.inner.storage.set(STORAGE_KEY, format_flag(authenticated));
        if changed {
            self.inner.observers.notify(&authenticated);
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.inner.observers.subscribe(listener)
    }
}

fn parse_flag(raw: Option<&str>) -> bool {
    matches!(raw, Some("true"))
}

fn format_flag(authenticated: bool) -> &'static str {
    if authenticated { "true" } else { "false" }
}
