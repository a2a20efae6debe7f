//! The credential context shared by the HTTP adapter and the page shell.

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError, RwLock},
};

type ExpiryObserver = Arc<dyn Fn() + Send + Sync>;

/// Holds the bearer credential for the current user.
///
/// A session is cheap to clone and clones share the same credential, so the
/// HTTP adapter and the page shell can each hold one. The credential is an
/// opaque string and is never parsed.
///
/// When the backend stops accepting the credential, [Session::expire] clears
/// it and notifies every observer registered with [Session::on_expired].
#[derive(Clone, Default)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Default)]
struct SessionInner {
    token: RwLock<Option<String>>,
    observers: Mutex<Vec<ExpiryObserver>>,
}

impl Session {
    /// Create a session without a credential.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session that starts with `token` as its credential.
    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.set_token(token);
        session
    }

    /// The current credential, if any.
    pub fn token(&self) -> Option<String> {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether the session currently holds a credential.
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Replace the credential, e.g. after logging in.
    pub fn set_token(&self, token: impl Into<String>) {
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    /// Remove the credential without notifying observers, e.g. when the user
    /// logs out.
    pub fn clear(&self) {
        self.inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    /// Register `observer` to be called whenever the session expires.
    pub fn on_expired(&self, observer: impl Fn() + Send + Sync + 'static) {
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(observer));
    }

    /// Clear the credential and notify every expiry observer.
    ///
    /// Observers are called after the credential has been cleared and without
    /// any of the session's locks held.
    pub fn expire(&self) {
        self.clear();

        let observers = self
            .inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        tracing::info!(
            "Session expired, notifying {} observer(s).",
            observers.len()
        );

        for observer in observers {
            observer();
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("is_authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}
