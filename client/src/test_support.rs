//! Fakes shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::channel::oneshot;

use crate::auth::error::{AuthError, ValidationError};
use crate::auth::verifier::{CredentialVerifier, Credentials, IdentifierKind, SessionCheck};
use crate::net::account::{AccountError, AccountService};
use crate::net::types::RemoteSession;

/// Account service answering from fixed results and recording each call.
#[derive(Clone)]
pub struct FakeAccount {
    pub create: Result<RemoteSession, AccountError>,
    pub current: Result<RemoteSession, AccountError>,
    pub delete: Result<(), AccountError>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl Default for FakeAccount {
    fn default() -> Self {
        Self {
            create: Ok(RemoteSession { id: "sess_1".to_owned() }),
            current: Err(AccountError::Rejected { status: 401, message: None }),
            delete: Ok(()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl FakeAccount {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait(?Send)]
impl AccountService for FakeAccount {
    async fn create_email_password_session(&self, email: &str, _password: &str) -> Result<RemoteSession, AccountError> {
        self.calls.lock().unwrap().push(format!("create:{email}"));
        self.create.clone()
    }

    async fn get_current_session(&self) -> Result<RemoteSession, AccountError> {
        self.calls.lock().unwrap().push("current".to_owned());
        self.current.clone()
    }

    async fn delete_current_session(&self) -> Result<(), AccountError> {
        self.calls.lock().unwrap().push("delete".to_owned());
        self.delete.clone()
    }
}

/// Verifier whose `verify` and `current_session` calls wait on results the
/// test sends later, in call order. Used to interleave overlapping attempts.
#[derive(Default)]
pub struct GatedVerifier {
    gates: Mutex<VecDeque<oneshot::Receiver<Result<(), AuthError>>>>,
    session_gates: Mutex<VecDeque<oneshot::Receiver<SessionCheck>>>,
}

impl GatedVerifier {
    /// Queue one gate and return the sender that releases it.
    pub fn gate(&self) -> oneshot::Sender<Result<(), AuthError>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }

    /// Queue one session check gate. Without one, the check is unsupported.
    pub fn session_gate(&self) -> oneshot::Sender<SessionCheck> {
        let (tx, rx) = oneshot::channel();
        self.session_gates.lock().unwrap().push_back(rx);
        tx
    }
}

#[async_trait(?Send)]
impl CredentialVerifier for GatedVerifier {
    fn identifier_kind(&self) -> IdentifierKind {
        IdentifierKind::Username
    }

    fn validate(&self, _credentials: &Credentials) -> Result<(), ValidationError> {
        Ok(())
    }

    async fn verify(&self, _credentials: &Credentials) -> Result<(), AuthError> {
        let gate = self.gates.lock().unwrap().pop_front().expect("no gate queued");
        gate.await.unwrap_or_else(|_| Err(AuthError::Remote("gate dropped".to_owned())))
    }

    async fn current_session(&self) -> SessionCheck {
        let gate = self.session_gates.lock().unwrap().pop_front();
        match gate {
            Some(gate) => gate.await.unwrap_or(SessionCheck::Unsupported),
            None => SessionCheck::Unsupported,
        }
    }
}
