use std::sync::atomic::AtomicUsize;

use futures::executor::block_on;

use super::*;
use crate::auth::error::{AuthError, INVALID_CREDENTIALS_MESSAGE};
use crate::auth::validation::{FIELD_IDENTIFIER, FIELD_SECRET};
use crate::auth::verifier::{LocalVerifier, RemoteVerifier};
use crate::net::account::AccountError;
use crate::net::types::RemoteSession;
use crate::state::session::STORAGE_KEY;
use crate::test_support::{FakeAccount, GatedVerifier};
use crate::util::storage::{KeyValueStore, MemoryStorage};

fn local_auth(storage: &MemoryStorage) -> Auth {
    Auth::new(SessionStore::load(Arc::new(storage.clone())), Arc::new(LocalVerifier), LogoutMode::LocalOnly)
}

fn remote_auth(storage: &MemoryStorage, account: FakeAccount, mode: LogoutMode) -> Auth {
    Auth::new(SessionStore::load(Arc::new(storage.clone())), Arc::new(RemoteVerifier::new(account)), mode)
}

fn assert_invariant(status: &AuthStatus) {
    assert!(!(status.authenticated && status.error.is_some()), "authenticated with error: {status:?}");
}

// =============================================================
// Local strategy
// =============================================================

#[test]
fn starts_anonymous_without_persisted_flag() {
    let auth = local_auth(&MemoryStorage::new());
    assert_eq!(auth.status(), AuthStatus::default());
    assert_eq!(auth.identifier_kind(), IdentifierKind::Username);
}

#[test]
fn correct_credentials_authenticate() {
    let storage = MemoryStorage::new();
    let auth = local_auth(&storage);

    assert!(block_on(auth.login("user", "password")));

    let status = auth.status();
    assert!(status.authenticated);
    assert_eq!(status.error, None);
    assert!(auth.is_logged_in());
    assert_eq!(storage.get(STORAGE_KEY).as_deref(), Some("true"));
}

#[test]
fn wrong_credentials_set_error_and_stay_anonymous() {
    let auth = local_auth(&MemoryStorage::new());
    for (id, secret) in [("user", "wrong"), ("admin", "password"), ("", "")] {
        assert!(!block_on(auth.login(id, secret)));
        let status = auth.status();
        assert!(!status.authenticated);
        assert_eq!(status.error.as_deref(), Some(INVALID_CREDENTIALS_MESSAGE));
        assert_eq!(auth.error().as_deref(), Some("Invalid username or password."));
    }
}

#[test]
fn success_clears_previous_error() {
    let auth = local_auth(&MemoryStorage::new());
    assert!(!block_on(auth.login("user", "nope")));
    assert!(auth.error().is_some());
    assert!(block_on(auth.login("user", "password")));
    assert_eq!(auth.error(), None);
    assert_invariant(&auth.status());
}

#[test]
fn failed_login_while_authenticated_signs_out() {
    let storage = MemoryStorage::new();
    let auth = local_auth(&storage);

    assert!(block_on(auth.login("user", "password")));
    assert!(!block_on(auth.login("user", "wrong")));

    let status = auth.status();
    assert!(!status.authenticated);
    assert_eq!(status.error.as_deref(), Some(INVALID_CREDENTIALS_MESSAGE));
    assert_eq!(storage.get(STORAGE_KEY).as_deref(), Some("false"));
}

#[test]
fn logout_always_resets() {
    let auth = local_auth(&MemoryStorage::new());

    block_on(auth.logout());
    assert_eq!(auth.status(), AuthStatus::default());

    assert!(!block_on(auth.login("user", "bad")));
    block_on(auth.logout());
    assert_eq!(auth.status(), AuthStatus::default());

    assert!(block_on(auth.login("user", "password")));
    block_on(auth.logout());
    assert_eq!(auth.status(), AuthStatus::default());
}

#[test]
fn persisted_flag_seeds_next_instance() {
    let storage = MemoryStorage::new();
    assert!(block_on(local_auth(&storage).login("user", "password")));

    let reloaded = local_auth(&storage);
    assert!(reloaded.is_logged_in());

    block_on(reloaded.logout());
    assert!(!local_auth(&storage).is_logged_in());
}

#[test]
fn local_restore_keeps_persisted_flag() {
    let storage = MemoryStorage::new();
    storage.set(STORAGE_KEY, "true");
    let auth = local_auth(&storage);
    assert!(block_on(auth.restore_session()));
}

// =============================================================
// Subscribers
// =============================================================

#[test]
fn subscribers_receive_each_change_once() {
    let auth = local_auth(&MemoryStorage::new());
    let seen = Arc::new(Mutex::new(Vec::<AuthStatus>::new()));
    let _sub = {
        let seen = Arc::clone(&seen);
        auth.subscribe(move |status| seen.lock().unwrap().push(status.clone()))
    };

    assert!(block_on(auth.login("user", "password")));
    assert!(block_on(auth.login("user", "password")));
    block_on(auth.logout());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen[0].authenticated);
    assert!(!seen[1].authenticated);
    seen.iter().for_each(assert_invariant);
}

#[test]
fn dropped_subscription_is_not_called() {
    let auth = local_auth(&MemoryStorage::new());
    let hits = Arc::new(AtomicUsize::new(0));
    let sub = {
        let hits = Arc::clone(&hits);
        auth.subscribe(move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    };
    drop(sub);
    assert!(block_on(auth.login("user", "password")));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn listener_reading_status_sees_published_state() {
    let auth = local_auth(&MemoryStorage::new());
    let reader = auth.clone();
    let agreed = Arc::new(AtomicUsize::new(0));
    let _sub = {
        let agreed = Arc::clone(&agreed);
        auth.subscribe(move |status| {
            if reader.status() == *status {
                agreed.fetch_add(1, Ordering::SeqCst);
            }
        })
    };
    assert!(!block_on(auth.login("user", "x")));
    assert!(block_on(auth.login("user", "password")));
    assert_eq!(agreed.load(Ordering::SeqCst), 2);
}

// =============================================================
// Remote strategy
// =============================================================

#[test]
fn remote_validation_short_circuits_before_network() {
    let account = FakeAccount::default();
    let auth = remote_auth(&MemoryStorage::new(), account.clone(), LogoutMode::LocalOnly);

    assert!(!block_on(auth.login("not-an-email", "short")));

    assert!(account.calls().is_empty());
    let status = auth.status();
    assert!(!status.authenticated);
    assert_eq!(status.error, None);
    assert!(status.field_errors.contains_key(FIELD_IDENTIFIER));
    assert!(status.field_errors.contains_key(FIELD_SECRET));
}

#[test]
fn remote_validation_failure_keeps_authenticated_flag() {
    let storage = MemoryStorage::new();
    storage.set(STORAGE_KEY, "true");
    let auth = remote_auth(&storage, FakeAccount::default(), LogoutMode::LocalOnly);

    assert!(!block_on(auth.login("bad", "password123")));
    let status = auth.status();
    assert!(status.authenticated);
    assert_eq!(status.error, None);
    assert!(status.field_errors.contains_key(FIELD_IDENTIFIER));
}

#[test]
fn remote_success_clears_field_errors() {
    let account = FakeAccount::default();
    let auth = remote_auth(&MemoryStorage::new(), account.clone(), LogoutMode::LocalOnly);

    assert!(!block_on(auth.login("nope", "short")));
    assert!(block_on(auth.login("admin@example.com", "password123")));

    let status = auth.status();
    assert!(status.authenticated);
    assert!(status.field_errors.is_empty());
    assert_eq!(account.calls(), ["create:admin@example.com"]);
}

#[test]
fn remote_rejection_surfaces_service_message() {
    let account = FakeAccount {
        create: Err(AccountError::Rejected { status: 401, message: Some("Invalid credentials.".to_owned()) }),
        ..FakeAccount::default()
    };
    let auth = remote_auth(&MemoryStorage::new(), account, LogoutMode::LocalOnly);

    assert!(!block_on(auth.login("admin@example.com", "password123")));
    assert_eq!(auth.error().as_deref(), Some("Invalid credentials."));
}

#[test]
fn remote_rejection_without_message_uses_fallback() {
    let account = FakeAccount { create: Err(AccountError::Unavailable), ..FakeAccount::default() };
    let auth = remote_auth(&MemoryStorage::new(), account, LogoutMode::LocalOnly);

    assert!(!block_on(auth.login("admin@example.com", "password123")));
    assert_eq!(auth.error().as_deref(), Some("Invalid email or password"));
}

#[test]
fn restore_with_live_session_authenticates() {
    let account = FakeAccount { current: Ok(RemoteSession { id: "u1".to_owned() }), ..FakeAccount::default() };
    let storage = MemoryStorage::new();
    let auth = remote_auth(&storage, account, LogoutMode::LocalOnly);

    assert!(block_on(auth.restore_session()));
    assert!(auth.status().authenticated);
    assert_eq!(storage.get(STORAGE_KEY).as_deref(), Some("true"));
}

#[test]
fn restore_without_session_decays_persisted_flag() {
    let storage = MemoryStorage::new();
    storage.set(STORAGE_KEY, "true");
    let auth = remote_auth(&storage, FakeAccount::default(), LogoutMode::LocalOnly);
    assert!(auth.is_logged_in());

    assert!(!block_on(auth.restore_session()));
    assert_eq!(storage.get(STORAGE_KEY).as_deref(), Some("false"));
}

#[test]
fn restore_with_unreachable_service_keeps_persisted_flag() {
    let storage = MemoryStorage::new();
    storage.set(STORAGE_KEY, "true");
    let account = FakeAccount { current: Err(AccountError::Transport("offline".to_owned())), ..FakeAccount::default() };
    let auth = remote_auth(&storage, account, LogoutMode::LocalOnly);

    assert!(block_on(auth.restore_session()));
}

#[test]
fn local_only_logout_skips_remote_call() {
    let account = FakeAccount::default();
    let auth = remote_auth(&MemoryStorage::new(), account.clone(), LogoutMode::LocalOnly);
    assert!(block_on(auth.login("admin@example.com", "password123")));

    block_on(auth.logout());

    assert!(!auth.is_logged_in());
    assert_eq!(account.calls(), ["create:admin@example.com"]);
}

#[test]
fn invalidating_logout_ends_remote_session() {
    let account = FakeAccount::default();
    let auth = remote_auth(&MemoryStorage::new(), account.clone(), LogoutMode::InvalidateRemote);
    assert!(block_on(auth.login("admin@example.com", "password123")));

    block_on(auth.logout());

    assert!(!auth.is_logged_in());
    assert_eq!(account.calls(), ["create:admin@example.com", "delete"]);
}

#[test]
fn failed_remote_invalidation_still_signs_out() {
    let account = FakeAccount { delete: Err(AccountError::Transport("offline".to_owned())), ..FakeAccount::default() };
    let auth = remote_auth(&MemoryStorage::new(), account, LogoutMode::InvalidateRemote);
    assert!(block_on(auth.login("admin@example.com", "password123")));

    block_on(auth.logout());

    assert_eq!(auth.status(), AuthStatus::default());
}

// =============================================================
// Overlapping attempts
// =============================================================

fn gated_auth() -> (Auth, Arc<GatedVerifier>) {
    let verifier = Arc::new(GatedVerifier::default());
    let store = SessionStore::load(Arc::new(MemoryStorage::new()));
    let auth = Auth::new(store, Arc::clone(&verifier) as Arc<dyn CredentialVerifier>, LogoutMode::LocalOnly);
    (auth, verifier)
}

#[test]
fn superseded_success_is_dropped() {
    let (auth, verifier) = gated_auth();
    let older = verifier.gate();
    let newer = verifier.gate();

    let (first, second, ()) = block_on(async {
        futures::join!(auth.login("user", "password"), auth.login("user", "wrong"), async {
            newer.send(Err(AuthError::InvalidCredentials)).unwrap();
            older.send(Ok(())).unwrap();
        })
    });

    assert!(!first);
    assert!(!second);
    let status = auth.status();
    assert!(!status.authenticated);
    assert_eq!(status.error.as_deref(), Some(INVALID_CREDENTIALS_MESSAGE));
}

#[test]
fn superseded_failure_does_not_undo_newer_success() {
    let (auth, verifier) = gated_auth();
    let older = verifier.gate();
    let newer = verifier.gate();

    let (first, second, ()) = block_on(async {
        futures::join!(auth.login("user", "wrong"), auth.login("user", "password"), async {
            newer.send(Ok(())).unwrap();
            older.send(Err(AuthError::InvalidCredentials)).unwrap();
        })
    });

    assert!(!first);
    assert!(second);
    let status = auth.status();
    assert!(status.authenticated);
    assert_eq!(status.error, None);
}

#[test]
fn logout_supersedes_inflight_login() {
    let (auth, verifier) = gated_auth();
    let gate = verifier.gate();

    let (logged_in, ()) = block_on(async {
        futures::join!(auth.login("user", "password"), async {
            auth.logout().await;
            gate.send(Ok(())).unwrap();
        })
    });

    assert!(!logged_in);
    assert!(!auth.is_logged_in());
}

#[test]
fn restore_does_not_undo_login_completed_during_check() {
    let (auth, verifier) = gated_auth();
    let login_gate = verifier.gate();
    let session_gate = verifier.session_gate();

    let (logged_in, restored, ()) = block_on(async {
        futures::join!(auth.login("user", "password"), auth.restore_session(), async {
            login_gate.send(Ok(())).unwrap();
            session_gate.send(SessionCheck::Absent).unwrap();
        })
    });

    assert!(logged_in);
    assert!(restored);
    assert!(auth.is_logged_in());
    assert_invariant(&auth.status());
}

#[test]
fn restore_does_not_undo_logout_completed_during_check() {
    let (auth, verifier) = gated_auth();
    verifier.gate().send(Ok(())).unwrap();
    assert!(block_on(auth.login("user", "password")));
    let session_gate = verifier.session_gate();

    let (restored, ()) = block_on(async {
        futures::join!(auth.restore_session(), async {
            auth.logout().await;
            session_gate.send(SessionCheck::Active).unwrap();
        })
    });

    assert!(!restored);
    assert!(!auth.is_logged_in());
}
