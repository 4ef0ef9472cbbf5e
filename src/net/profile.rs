//! Profile lookup: `users` row by auth user id, mapped into the domain `User`.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use super::types::{ProfileRow, User};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    /// Zero rows, or more than one, matched the id.
    #[error("profile not found: {0}")]
    NotFound(String),
    #[error("profile lookup failed: {0}")]
    Backend(String),
}

/// Read access to the persisted profile table.
#[async_trait::async_trait(?Send)]
pub trait ProfileStore: Send + Sync {
    /// Fetch exactly one profile row by user id.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NotFound`] unless exactly one row matches.
    async fn find_profile_by_id(&self, id: &str) -> Result<ProfileRow, ProfileError>;
}

/// Load and map the profile for `user_id`.
///
/// # Errors
///
/// Propagates the store's [`ProfileError`].
pub async fn load_profile(store: &dyn ProfileStore, user_id: &str) -> Result<User, ProfileError> {
    store.find_profile_by_id(user_id).await.map(User::from)
}

/// Enforce the one-row contract on a list-shaped query result.
///
/// # Errors
///
/// Returns [`ProfileError::NotFound`] for an empty or ambiguous result.
pub fn single_row(id: &str, mut rows: Vec<ProfileRow>) -> Result<ProfileRow, ProfileError> {
    match rows.len() {
        1 => Ok(rows.remove(0)),
        0 => Err(ProfileError::NotFound(id.to_owned())),
        n => Err(ProfileError::NotFound(format!("{id} ({n} rows)"))),
    }
}
