//! Auth context provider and accessor.
//!
//! SYSTEM CONTEXT
//! ==============
//! `AuthProvider` owns the auth store for its subtree: it creates the state
//! signal, starts bootstrap and the session listener, and releases the
//! listener when the subtree is torn down. Descendants reach it through
//! `use_auth`.

use std::sync::Arc;

use leptos::prelude::*;

use crate::net::profile::ProfileStore;
use crate::net::session::{AuthError, SessionClient};
use crate::net::types::SignUpMetadata;
use crate::state::auth::AuthState;
use crate::state::auth_flow::AuthService;

/// Read-only auth snapshot plus the credential operations.
#[derive(Clone, Copy)]
pub struct AuthContext {
    state: RwSignal<AuthState>,
    service: StoredValue<AuthService<RwSignal<AuthState>>>,
}

impl AuthContext {
    /// Current state; tracked when read inside a reactive scope.
    pub fn state(&self) -> AuthState {
        self.state.get()
    }

    pub fn signal(&self) -> ReadSignal<AuthState> {
        self.state.read_only()
    }

    /// # Errors
    ///
    /// Returns the backend error; it is also recorded in `state().error`.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.service.get_value().login(email, password).await
    }

    /// # Errors
    ///
    /// Returns the backend error; it is also recorded in `state().error`.
    pub async fn sign_up(&self, email: &str, password: &str, metadata: &SignUpMetadata) -> Result<(), AuthError> {
        self.service.get_value().sign_up(email, password, metadata).await
    }

    pub async fn logout(&self) {
        self.service.get_value().logout().await;
    }
}

/// Provide [`AuthContext`] to `children`.
#[component]
pub fn AuthProvider(
    client: Arc<dyn SessionClient>,
    profiles: Arc<dyn ProfileStore>,
    children: Children,
) -> impl IntoView {
    let state = RwSignal::new(AuthState::default());
    let service = AuthService::new(client, profiles, state);

    #[cfg(feature = "csr")]
    {
        // Subscribe before bootstrapping so no change is missed in between.
        let subscription = service.subscribe();
        let handle = subscription.handle();
        let listener = service.clone();
        leptos::task::spawn_local(async move { listener.listen(subscription).await });
        let boot = service.clone();
        leptos::task::spawn_local(async move { boot.bootstrap().await });
        on_cleanup(move || handle.unsubscribe());
    }

    provide_context(AuthContext { state, service: StoredValue::new(service) });
    children()
}

/// Access the auth context.
///
/// # Panics
///
/// Panics when called outside an [`AuthProvider`]; that is a wiring bug, not
/// a runtime condition.
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("use_auth must be called within an AuthProvider")
}
