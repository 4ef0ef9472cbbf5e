//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components wire the auth store into the view tree: the provider, the route
//! guard, the deferred page mount, and shared page chrome.

pub mod auth_provider;
pub mod lazy_page;
pub mod page_shell;
pub mod route_guard;
