//! Shared DTOs for the Supabase auth and profile boundary.
//!
//! DESIGN
//! ======
//! Field names mirror GoTrue / PostgREST payloads (snake_case) so serde
//! round-trips stay lossless; the domain `User` is derived from a
//! `ProfileRow`, never deserialized directly.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Application role controlling which routes a user may reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    ProductionOperator,
    DispatchCoordinator,
    CsiFieldWorker,
    ThfcProductionOperator,
    ZohoAdmin,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::ProductionOperator,
        Role::DispatchCoordinator,
        Role::CsiFieldWorker,
        Role::ThfcProductionOperator,
        Role::ZohoAdmin,
    ];

    /// Wire name as stored in the `users.role` column.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::ProductionOperator => "production_operator",
            Role::DispatchCoordinator => "dispatch_coordinator",
            Role::CsiFieldWorker => "csi_field_worker",
            Role::ThfcProductionOperator => "thfc_production_operator",
            Role::ZohoAdmin => "zoho_admin",
        }
    }

    /// Human-readable label for selects and headers.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Role::ProductionOperator => "Production Operator",
            Role::DispatchCoordinator => "Dispatch Coordinator",
            Role::CsiFieldWorker => "CSI Field Worker",
            Role::ThfcProductionOperator => "THFC Production Operator",
            Role::ZohoAdmin => "Zoho Admin",
        }
    }

    /// Landing route after a successful login.
    #[must_use]
    pub fn home_path(self) -> &'static str {
        match self {
            Role::ProductionOperator | Role::CsiFieldWorker | Role::ThfcProductionOperator => "/field-worker",
            Role::DispatchCoordinator => "/dispatch",
            Role::ZohoAdmin => "/admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_owned()))
    }
}

/// The authenticated account embedded in a GoTrue session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Auth user identifier (UUID string); also the profile row key.
    pub id: String,
    /// Account email, absent for phone-only accounts.
    #[serde(default)]
    pub email: Option<String>,
}

/// Backend-issued session bundle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Expiry in seconds since the Unix epoch.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: SessionUser,
}

impl Session {
    /// Identifier used to look up the profile row.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    /// True when the access token is past its expiry at `now_secs`.
    /// Sessions without an expiry never expire client-side.
    #[must_use]
    pub fn is_expired(&self, now_secs: i64) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now_secs)
    }
}

/// A row of the `users` profile table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Application-level identity of the signed-in user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

impl From<ProfileRow> for User {
    fn from(row: ProfileRow) -> Self {
        Self { id: row.id, email: row.email, full_name: row.full_name, role: row.role }
    }
}

/// Profile metadata attached to a new account at sign-up; a backend trigger
/// materializes the `users` row from it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpMetadata {
    pub full_name: String,
    pub role: Role,
}
