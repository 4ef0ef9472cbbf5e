//! Supabase project configuration.
//!
//! Values are baked in at build time from `SUPABASE_URL` and
//! `SUPABASE_ANON_KEY`; a WASM bundle has no process environment at runtime.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Default API URL of a local `supabase start` stack.
pub const DEFAULT_SUPABASE_URL: &str = "http://127.0.0.1:54321";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("SUPABASE_URL must start with http:// or https://, got {0:?}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    /// Project API URL without a trailing slash.
    pub url: String,
    /// Public anon key sent as the `apikey` header.
    pub anon_key: String,
}

impl SupabaseConfig {
    /// Validate and normalize a project URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] for a non-http(s) URL.
    pub fn new(url: &str, anon_key: &str) -> Result<Self, ConfigError> {
        let trimmed = url.trim().trim_end_matches('/');
        let host = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .unwrap_or_default();
        if host.is_empty() {
            return Err(ConfigError::InvalidUrl(url.to_owned()));
        }
        Ok(Self { url: trimmed.to_owned(), anon_key: anon_key.trim().to_owned() })
    }

    /// Local `supabase start` stack with no anon key.
    #[must_use]
    pub fn local() -> Self {
        Self { url: DEFAULT_SUPABASE_URL.to_owned(), anon_key: String::new() }
    }

    /// Build from compile-time environment, falling back to the local dev stack.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if `SUPABASE_URL` was set to a bad value.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::new(
            option_env!("SUPABASE_URL").unwrap_or(DEFAULT_SUPABASE_URL),
            option_env!("SUPABASE_ANON_KEY").unwrap_or_default(),
        )
    }

    /// First label of the host (`abcd` for `https://abcd.supabase.co`).
    #[must_use]
    pub fn project_ref(&self) -> &str {
        let host = self
            .url
            .split_once("://")
            .map_or(self.url.as_str(), |(_, rest)| rest);
        let host = host.split(['/', ':']).next().unwrap_or(host);
        host.split('.').next().unwrap_or(host)
    }

    /// `localStorage` key the session is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> String {
        format!("sb-{}-auth-token", self.project_ref())
    }

    /// GoTrue endpoint, e.g. `auth_url("token?grant_type=password")`.
    #[must_use]
    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.url)
    }

    /// PostgREST endpoint, e.g. `rest_url("users?id=eq.1")`.
    #[must_use]
    pub fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{path}", self.url)
    }
}
