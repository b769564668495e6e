//! Authoritative, observable authentication state.
//!
//! The store is the sole writer of [`Session`]; the gateway and the auth
//! flows request mutation only through [`SessionStore::set_identity`] and
//! [`SessionStore::clear`]. Everything else reads or subscribes.

use std::sync::atomic::{AtomicU64, Ordering};

use loco_common::User;
use tokio::sync::watch;

/// A snapshot of who the client believes it is.
///
/// Authenticated if and only if an identity is present; the invariant holds
/// by construction, there is no separate flag to drift.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    identity: Option<User>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    pub fn authenticated(user: User) -> Self {
        Self {
            identity: Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn identity(&self) -> Option<&User> {
        self.identity.as_ref()
    }
}

/// Shared session store. Cheap to share behind an `Arc`.
pub struct SessionStore {
    tx: watch::Sender<Session>,
    /// Bumped on every authenticated ⇄ anonymous transition. Stale handles
    /// (notification streams, in-flight loops) compare against this to
    /// detect that they belong to a previous login.
    epoch: AtomicU64,
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::anonymous());
        Self {
            tx,
            epoch: AtomicU64::new(0),
        }
    }

    /// Replace the session with an authenticated identity. Subscribers are
    /// notified synchronously.
    pub fn set_identity(&self, user: User) {
        self.tx.send_modify(|session| {
            if !session.is_authenticated() {
                self.epoch.fetch_add(1, Ordering::SeqCst);
            }
            *session = Session::authenticated(user);
        });
    }

    /// Reset to anonymous. Idempotent: clearing an already-anonymous
    /// session notifies nobody and leaves the epoch alone.
    pub fn clear(&self) {
        self.tx.send_if_modified(|session| {
            if !session.is_authenticated() {
                return false;
            }
            self.epoch.fetch_add(1, Ordering::SeqCst);
            *session = Session::anonymous();
            true
        });
    }

    /// Current snapshot. Never blocks.
    pub fn read(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// Subscribe to session changes (route guards, the notification
    /// supervisor, UI state).
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
