//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every guarded route applies the same role check; it is a pure function of
//! the current `AuthState` so it can be re-evaluated on every render.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::Role;
use crate::state::auth::AuthState;

/// Path unauthorized visitors are sent to.
pub const ROOT_PATH: &str = "/";

/// Outcome of a route access check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// Navigate to `to`, replacing the current history entry when `replace`.
    Redirect { to: &'static str, replace: bool },
}

impl Access {
    const DENIED: Access = Access::Redirect { to: ROOT_PATH, replace: true };
}

/// Grant access only to an authenticated user whose role is in `allowed`.
#[must_use]
pub fn check_access(state: &AuthState, allowed: &[Role]) -> Access {
    if !state.is_authenticated {
        return Access::DENIED;
    }
    match &state.user {
        Some(user) if allowed.contains(&user.role) => Access::Granted,
        _ => Access::DENIED,
    }
}
