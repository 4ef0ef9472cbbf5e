//! # crate-ops
//!
//! Leptos + WASM client shell for the crate operations app: session
//! bootstrap against Supabase, the auth state store, and a role-gated route
//! table for field, dispatch and admin pages.
//!
//! Auth state transitions, routing decisions and backend response handling
//! are plain Rust and tested natively; components are thin wiring on top.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod routes;
pub mod state;
pub mod util;

/// Browser entry: install the panic hook and console logger, then mount
/// [`app::App`] onto `<body>`.
///
/// # Panics
///
/// Panics if a global logger is already installed.
#[cfg(feature = "csr")]
pub fn mount() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).expect("console logger already initialized");
    leptos::mount::mount_to_body(app::App);
}
