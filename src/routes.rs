//! Static route table and navigation resolution.
//!
//! ARCHITECTURE
//! ============
//! `Page` is the table: each variant knows its path, its role allow-list and
//! whether its module is loaded on demand. `app::App` mounts one `<Route>`
//! per page; `navigate` answers the same question without a router so the
//! table can be checked in isolation.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use crate::net::types::Role;
use crate::state::auth::AuthState;
use crate::util::auth::{Access, ROOT_PATH, check_access};

pub const FIELD_WORKER_ROLES: &[Role] =
    &[Role::CsiFieldWorker, Role::ThfcProductionOperator, Role::ProductionOperator];
pub const ADMIN_ROLES: &[Role] = &[Role::ZohoAdmin];
pub const DISPATCH_ROLES: &[Role] = &[Role::DispatchCoordinator];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Page {
    Login,
    FieldWorker,
    AdminDashboard,
    AdminUsers,
    AdminCrates,
    AdminLogs,
    AdminSettings,
    Dispatch,
}

impl Page {
    pub const ALL: [Page; 8] = [
        Page::Login,
        Page::FieldWorker,
        Page::AdminDashboard,
        Page::AdminUsers,
        Page::AdminCrates,
        Page::AdminLogs,
        Page::AdminSettings,
        Page::Dispatch,
    ];

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Page::Login => ROOT_PATH,
            Page::FieldWorker => "/field-worker",
            Page::AdminDashboard => "/admin",
            Page::AdminUsers => "/admin/users",
            Page::AdminCrates => "/admin/crates",
            Page::AdminLogs => "/admin/logs",
            Page::AdminSettings => "/admin/settings",
            Page::Dispatch => "/dispatch",
        }
    }

    /// Roles allowed to view the page; `None` for public pages.
    #[must_use]
    pub fn allowed_roles(self) -> Option<&'static [Role]> {
        match self {
            Page::Login => None,
            Page::FieldWorker => Some(FIELD_WORKER_ROLES),
            Page::AdminDashboard
            | Page::AdminUsers
            | Page::AdminCrates
            | Page::AdminLogs
            | Page::AdminSettings => Some(ADMIN_ROLES),
            Page::Dispatch => Some(DISPATCH_ROLES),
        }
    }

    /// Pages whose module is initialized on first visit behind a placeholder.
    #[must_use]
    pub fn is_lazy(self) -> bool {
        matches!(self, Page::AdminCrates | Page::AdminLogs | Page::AdminSettings)
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Page::Login => "Sign in",
            Page::FieldWorker => "Field Work",
            Page::AdminDashboard => "Admin Dashboard",
            Page::AdminUsers => "Users",
            Page::AdminCrates => "Crate Management",
            Page::AdminLogs => "Activity Logs",
            Page::AdminSettings => "System Settings",
            Page::Dispatch => "Dispatch",
        }
    }

    /// Exact lookup after normalizing the path.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Page> {
        let path = normalize_path(path);
        Page::ALL.into_iter().find(|page| page.path() == path)
    }
}

/// Where a navigation ends up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Render(Page),
    Redirect { to: &'static str, replace: bool },
}

/// Resolve `path` against the table and the guard for the current state.
/// Unknown paths redirect to the root, replacing history.
#[must_use]
pub fn navigate(state: &AuthState, path: &str) -> Navigation {
    let Some(page) = Page::from_path(path) else {
        return Navigation::Redirect { to: ROOT_PATH, replace: true };
    };
    let Some(allowed) = page.allowed_roles() else {
        return Navigation::Render(page);
    };
    match check_access(state, allowed) {
        Access::Granted => Navigation::Render(page),
        Access::Redirect { to, replace } => Navigation::Redirect { to, replace },
    }
}

/// Drop query, fragment, and trailing slashes; empty becomes `/`.
fn normalize_path(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { ROOT_PATH } else { trimmed }
}
