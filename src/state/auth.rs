//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read by route guards and user-aware components; written only through
//! [`AuthAction`]s so every transition is a pure function of
//! (prior state, action).

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::{Session, User};

/// Authentication state shared through context.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub session: Option<Session>,
}

impl Default for AuthState {
    /// Mount-time state: nothing known yet, bootstrap in flight.
    fn default() -> Self {
        Self { is_authenticated: false, user: None, is_loading: true, error: None, session: None }
    }
}

/// The only transitions the auth store accepts.
#[derive(Clone, Debug, PartialEq)]
pub enum AuthAction {
    SetSession(Option<Session>),
    SetUser(Option<User>),
    SetLoading(bool),
    SetError(Option<String>),
    Logout,
}

impl AuthState {
    /// Apply one action, returning the next state.
    #[must_use]
    pub fn reduce(self, action: AuthAction) -> Self {
        match action {
            AuthAction::SetSession(session) => {
                Self { is_authenticated: session.is_some(), session, ..self }
            }
            AuthAction::SetUser(user) => Self { is_authenticated: user.is_some(), user, ..self },
            AuthAction::SetLoading(is_loading) => Self { is_loading, ..self },
            AuthAction::SetError(error) => Self { error, ..self },
            AuthAction::Logout => Self { is_loading: false, ..Self::default() },
        }
    }

    /// In-place variant used by signal updates.
    pub fn apply(&mut self, action: AuthAction) {
        *self = std::mem::take(self).reduce(action);
    }

    /// Role of the resolved user, if any.
    #[must_use]
    pub fn role(&self) -> Option<crate::net::types::Role> {
        self.user.as_ref().map(|u| u.role)
    }
}
