//! Auth flows: session bootstrap, change listener, credential operations.
//!
//! SYSTEM CONTEXT
//! ==============
//! `AuthService` is the only writer of `AuthState`. It talks to the session
//! client and profile store and funnels every result through an `AuthSink`,
//! which is the `RwSignal<AuthState>` provided to the UI in the app and a
//! plain recording store in tests.
//!
//! STALE REPLIES
//! =============
//! Bootstrap and the change listener run concurrently. Every session
//! transition bumps an epoch; a profile lookup that started under an older
//! epoch drops its result instead of dispatching it, so a sign-out that lands
//! while a lookup is pending cannot be overwritten by that lookup's user.

#[cfg(test)]
#[path = "auth_flow_test.rs"]
mod auth_flow_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use leptos::prelude::*;

use super::auth::{AuthAction, AuthState};
use crate::net::profile::{ProfileStore, load_profile};
use crate::net::session::{AuthError, SessionChange, SessionClient, SessionEvent, Subscription};
use crate::net::types::{Session, SignUpMetadata};

pub const INIT_FAILED_MESSAGE: &str = "Failed to initialize auth";
pub const PROFILE_FAILED_MESSAGE: &str = "Failed to fetch user data";

/// Destination for auth state transitions.
pub trait AuthSink: Clone + 'static {
    fn dispatch(&self, action: AuthAction);
}

impl AuthSink for RwSignal<AuthState> {
    fn dispatch(&self, action: AuthAction) {
        // A disposed signal means the provider is gone; nothing to update.
        let _ = self.try_update(|state| state.apply(action));
    }
}

/// Clears the loading flag when a credential operation finishes, whether it
/// returned normally or its future was dropped.
struct LoadingGuard<'a, S: AuthSink> {
    sink: &'a S,
}

impl<S: AuthSink> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        self.sink.dispatch(AuthAction::SetLoading(false));
    }
}

#[derive(Clone)]
pub struct AuthService<S> {
    client: Arc<dyn SessionClient>,
    profiles: Arc<dyn ProfileStore>,
    sink: S,
    epoch: Arc<AtomicU64>,
}

impl<S: AuthSink> AuthService<S> {
    pub fn new(client: Arc<dyn SessionClient>, profiles: Arc<dyn ProfileStore>, sink: S) -> Self {
        Self { client, profiles, sink, epoch: Arc::new(AtomicU64::new(0)) }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    // =========================================================================
    // BOOTSTRAP + LISTENER
    // =========================================================================

    /// Resolve the stored session (if any) and its profile, then clear loading.
    pub async fn bootstrap(&self) {
        match self.client.get_current_session().await {
            Ok(Some(session)) => {
                let user_id = session.user_id().to_owned();
                self.set_session(Some(session));
                self.load_user(&user_id, INIT_FAILED_MESSAGE).await;
                self.sink.dispatch(AuthAction::SetLoading(false));
            }
            Ok(None) => self.sink.dispatch(AuthAction::SetLoading(false)),
            Err(e) => {
                leptos::logging::warn!("auth initialization error: {e}");
                self.sink.dispatch(AuthAction::SetError(Some(INIT_FAILED_MESSAGE.to_owned())));
                self.sink.dispatch(AuthAction::SetLoading(false));
            }
        }
    }

    /// Register for session changes. Hand the result to [`Self::listen`].
    pub fn subscribe(&self) -> Subscription {
        self.client.on_session_change()
    }

    /// Apply session changes one at a time until the subscription is released.
    pub async fn listen(&self, mut subscription: Subscription) {
        while let Some(change) = subscription.next().await {
            self.handle_change(change).await;
        }
        leptos::logging::log!("session listener stopped");
    }

    pub async fn handle_change(&self, change: SessionChange) {
        match change.event {
            SessionEvent::SignedIn | SessionEvent::TokenRefreshed => {
                let user_id = change.session.as_ref().map(|s| s.user_id().to_owned());
                self.set_session(change.session);
                if let Some(user_id) = user_id {
                    self.load_user(&user_id, PROFILE_FAILED_MESSAGE).await;
                }
            }
            SessionEvent::SignedOut => self.reset(),
            SessionEvent::InitialSession | SessionEvent::UserUpdated | SessionEvent::PasswordRecovery => {}
        }
    }

    // =========================================================================
    // CREDENTIAL OPERATIONS
    // =========================================================================

    /// Sign in with email and password. The session itself arrives through
    /// the change listener.
    ///
    /// # Errors
    ///
    /// Returns the session client's error after recording it in state.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let _loading = self.begin();
        self.client
            .sign_in_with_password(email, password)
            .await
            .inspect_err(|e| self.record_failure("login", e))
    }

    /// Create an account; `metadata` seeds the profile row server-side.
    ///
    /// # Errors
    ///
    /// Returns the session client's error after recording it in state.
    pub async fn sign_up(&self, email: &str, password: &str, metadata: &SignUpMetadata) -> Result<(), AuthError> {
        let _loading = self.begin();
        self.client
            .sign_up(email, password, metadata)
            .await
            .inspect_err(|e| self.record_failure("sign-up", e))
    }

    /// Sign out. Failures are recorded in state only.
    pub async fn logout(&self) {
        let _loading = self.begin();
        match self.client.sign_out().await {
            Ok(()) => self.reset(),
            Err(e) => self.record_failure("logout", &e),
        }
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn begin(&self) -> LoadingGuard<'_, S> {
        self.sink.dispatch(AuthAction::SetLoading(true));
        self.sink.dispatch(AuthAction::SetError(None));
        LoadingGuard { sink: &self.sink }
    }

    fn record_failure(&self, op: &str, err: &AuthError) {
        leptos::logging::warn!("{op} error: {err}");
        self.sink.dispatch(AuthAction::SetError(Some(err.to_string())));
    }

    fn set_session(&self, session: Option<Session>) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.sink.dispatch(AuthAction::SetSession(session));
    }

    fn reset(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.sink.dispatch(AuthAction::Logout);
    }

    /// Resolve the profile for `user_id`; on failure record `failure_message`.
    async fn load_user(&self, user_id: &str, failure_message: &str) {
        let started = self.epoch.load(Ordering::SeqCst);
        let result = load_profile(self.profiles.as_ref(), user_id).await;
        if self.epoch.load(Ordering::SeqCst) != started {
            leptos::logging::log!("discarding stale profile reply for {user_id}");
            return;
        }
        match result {
            Ok(user) => self.sink.dispatch(AuthAction::SetUser(Some(user))),
            Err(e) => {
                leptos::logging::warn!("error fetching user data: {e}");
                self.sink.dispatch(AuthAction::SetError(Some(failure_message.to_owned())));
            }
        }
    }
}
