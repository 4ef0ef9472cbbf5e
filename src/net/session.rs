//! Session client seam and change-notification plumbing.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionClient` is the boundary to the hosted auth service. Session changes
//! are delivered as messages over an unbounded channel: each subscriber owns a
//! `Subscription` and the client keeps only the sending half, so a torn-down
//! consumer is never called back.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use futures::StreamExt;
use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use serde::{Deserialize, Serialize};

use super::types::{Session, SignUpMetadata};

/// Errors surfaced by the session client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The backend refused the request; the message is shown to the user verbatim.
    #[error("{0}")]
    Rejected(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("auth backend is not available in this environment")]
    Unavailable,
}

/// Kind of session change reported by the auth service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
    PasswordRecovery,
}

/// One notification: the event kind plus the session after the change.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionChange {
    pub event: SessionEvent,
    pub session: Option<Session>,
}

/// Async interface to the hosted auth service.
///
/// Futures are `?Send`: browser HTTP futures are bound to the JS event loop.
#[async_trait::async_trait(?Send)]
pub trait SessionClient: Send + Sync {
    /// Return the current session, if one is stored and still usable.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the stored session cannot be read or refreshed.
    async fn get_current_session(&self) -> Result<Option<Session>, AuthError>;

    /// Register for session-change notifications until the returned
    /// subscription is dropped or unsubscribed.
    fn on_session_change(&self) -> Subscription;

    /// Verify email + password credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Rejected`] for bad credentials.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), AuthError>;

    /// Create an account carrying `metadata` as user metadata.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the account cannot be created.
    async fn sign_up(&self, email: &str, password: &str, metadata: &SignUpMetadata) -> Result<(), AuthError>;

    /// End the current session.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the backend rejects the sign-out.
    async fn sign_out(&self) -> Result<(), AuthError>;
}

// =============================================================================
// LISTENERS
// =============================================================================

#[derive(Default)]
struct ListenerTable {
    next_id: u64,
    senders: HashMap<u64, UnboundedSender<SessionChange>>,
}

/// Fan-out registry of session-change subscribers, embedded by client
/// implementations.
#[derive(Clone, Default)]
pub struct SessionListeners {
    table: Arc<Mutex<ListenerTable>>,
}

impl SessionListeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = unbounded();
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let id = table.next_id;
        table.next_id += 1;
        table.senders.insert(id, tx);
        Subscription { receiver: rx, handle: SubscriptionHandle { id, table: Arc::downgrade(&self.table) } }
    }

    /// Deliver a change to every live subscriber; closed receivers are pruned.
    pub fn emit(&self, event: SessionEvent, session: Option<Session>) {
        let change = SessionChange { event, session };
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table
            .senders
            .retain(|_, tx| tx.unbounded_send(change.clone()).is_ok());
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.lock().unwrap_or_else(PoisonError::into_inner).senders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Receiving end of a session-change registration. Dropping it unsubscribes.
pub struct Subscription {
    receiver: UnboundedReceiver<SessionChange>,
    handle: SubscriptionHandle,
}

impl Subscription {
    /// Wait for the next change; `None` once unsubscribed and drained.
    pub async fn next(&mut self) -> Option<SessionChange> {
        self.receiver.next().await
    }

    /// Detached handle that can release this subscription from elsewhere
    /// (e.g. a UI cleanup hook) while the receiver is owned by a task.
    #[must_use]
    pub fn handle(&self) -> SubscriptionHandle {
        self.handle.clone()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.unsubscribe();
    }
}

/// Release token for a [`Subscription`]. Unsubscribing twice is a no-op.
#[derive(Clone)]
pub struct SubscriptionHandle {
    id: u64,
    table: Weak<Mutex<ListenerTable>>,
}

impl SubscriptionHandle {
    pub fn unsubscribe(&self) {
        if let Some(table) = self.table.upgrade() {
            table
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .senders
                .remove(&self.id);
        }
    }
}
