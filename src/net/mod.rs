//! Networking modules for the hosted auth and profile backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` and `profile` define the backend seams, `supabase` implements
//! them over REST, and `types` defines the shared wire schema.

pub mod profile;
pub mod session;
pub mod supabase;
pub mod types;
