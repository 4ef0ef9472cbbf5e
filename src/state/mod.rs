//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `auth` holds the state shape and its pure transitions; `auth_flow` owns
//! the async work that produces those transitions.

pub mod auth;
pub mod auth_flow;
