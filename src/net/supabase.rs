//! Supabase-backed session client and profile store.
//!
//! Browser (csr): real GoTrue / PostgREST calls via `gloo-net`, session
//! persisted in `localStorage`.
//! Elsewhere: network calls return [`AuthError::Unavailable`] and the session
//! lives only in memory.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses are decoded into the backend's own message so the login
//! form can show it verbatim; transport failures are kept distinct.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "supabase_test.rs"]
mod supabase_test;

use std::sync::{Mutex, PoisonError};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;

use super::profile::{ProfileError, ProfileStore, single_row};
use super::session::{AuthError, SessionClient, SessionEvent, SessionListeners, Subscription};
use super::types::{ProfileRow, Session, SignUpMetadata};
use crate::config::SupabaseConfig;

/// Client for one Supabase project.
pub struct SupabaseClient {
    config: SupabaseConfig,
    listeners: SessionListeners,
    current: Mutex<Option<Session>>,
}

impl SupabaseClient {
    #[must_use]
    pub fn new(config: SupabaseConfig) -> Self {
        Self { config, listeners: SessionListeners::new(), current: Mutex::new(None) }
    }

    #[must_use]
    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    /// Exchange the refresh token for a new session and notify listeners.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the refresh token is rejected.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let body = serde_json::json!({ "refresh_token": refresh_token });
        let text = self
            .post_checked(&self.config.auth_url("token?grant_type=refresh_token"), None, &body)
            .await?;
        let session = parse_session(&text)?;
        self.store_session(Some(&session));
        self.listeners.emit(SessionEvent::TokenRefreshed, Some(session.clone()));
        Ok(session)
    }

    /// Outcome of refreshing an expired stored session. Only a rejected
    /// refresh token discards the session; network and decode failures keep
    /// it stored for the next attempt.
    fn settle_refresh(&self, refreshed: Result<Session, AuthError>) -> Result<Option<Session>, AuthError> {
        match refreshed {
            Ok(fresh) => Ok(Some(fresh)),
            Err(AuthError::Rejected(reason)) => {
                leptos::logging::warn!("stored session expired and refresh was rejected: {reason}");
                self.store_session(None);
                Ok(None)
            }
            Err(e) => {
                leptos::logging::warn!("stored session expired and refresh failed: {e}");
                Err(e)
            }
        }
    }

    fn current_session(&self) -> Option<Session> {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner).clone();
        current.or_else(|| self.load_stored())
    }

    fn store_session(&self, session: Option<&Session>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = session.cloned();
        self.persist(session);
    }

    // =========================================================================
    // STORAGE
    // =========================================================================

    fn load_stored(&self) -> Option<Session> {
        #[cfg(feature = "csr")]
        {
            let raw = local_storage()?.get_item(&self.config.storage_key()).ok()??;
            serde_json::from_str(&raw).ok()
        }
        #[cfg(not(feature = "csr"))]
        {
            None
        }
    }

    fn persist(&self, session: Option<&Session>) {
        #[cfg(feature = "csr")]
        {
            let Some(storage) = local_storage() else {
                return;
            };
            let key = self.config.storage_key();
            match session.map(serde_json::to_string) {
                Some(Ok(raw)) => {
                    if let Err(e) = storage.set_item(&key, &raw) {
                        leptos::logging::warn!("session persist failed: {e:?}");
                    }
                }
                Some(Err(e)) => leptos::logging::warn!("session encode failed: {e}"),
                None => {
                    if let Err(e) = storage.remove_item(&key) {
                        leptos::logging::warn!("session removal failed: {e:?}");
                    }
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = session;
        }
    }

    // =========================================================================
    // HTTP
    // =========================================================================

    /// POST a JSON body and return `(status, body)` without judging the status.
    async fn post(
        &self,
        url: &str,
        bearer: Option<&str>,
        body: &serde_json::Value,
    ) -> Result<(u16, String), AuthError> {
        #[cfg(feature = "csr")]
        {
            let mut req = gloo_net::http::Request::post(url).header("apikey", &self.config.anon_key);
            if let Some(token) = bearer {
                req = req.header("Authorization", &format!("Bearer {token}"));
            }
            let resp = req
                .json(body)
                .map_err(|e| AuthError::Transport(e.to_string()))?
                .send()
                .await
                .map_err(|e| AuthError::Transport(e.to_string()))?;
            let status = resp.status();
            let text = resp.text().await.map_err(|e| AuthError::Transport(e.to_string()))?;
            Ok((status, text))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (url, bearer, body);
            Err(AuthError::Unavailable)
        }
    }

    async fn post_checked(
        &self,
        url: &str,
        bearer: Option<&str>,
        body: &serde_json::Value,
    ) -> Result<String, AuthError> {
        let (status, text) = self.post(url, bearer, body).await?;
        if is_success(status) {
            Ok(text)
        } else {
            Err(AuthError::Rejected(error_message(status, &text)))
        }
    }

    async fn get_rows(&self, url: &str) -> Result<Vec<ProfileRow>, ProfileError> {
        #[cfg(feature = "csr")]
        {
            let bearer = self
                .current_session()
                .map_or_else(|| self.config.anon_key.clone(), |s| s.access_token);
            let resp = gloo_net::http::Request::get(url)
                .header("apikey", &self.config.anon_key)
                .header("Authorization", &format!("Bearer {bearer}"))
                .send()
                .await
                .map_err(|e| ProfileError::Backend(e.to_string()))?;
            let status = resp.status();
            let text = resp.text().await.map_err(|e| ProfileError::Backend(e.to_string()))?;
            if !is_success(status) {
                return Err(ProfileError::Backend(error_message(status, &text)));
            }
            serde_json::from_str(&text).map_err(|e| ProfileError::Backend(e.to_string()))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = url;
            Err(ProfileError::Backend(AuthError::Unavailable.to_string()))
        }
    }
}

#[async_trait::async_trait(?Send)]
impl SessionClient for SupabaseClient {
    async fn get_current_session(&self) -> Result<Option<Session>, AuthError> {
        let Some(session) = self.current_session() else {
            return Ok(None);
        };
        if !session.is_expired(now_secs()) {
            return Ok(Some(session));
        }
        let refreshed = self.refresh_session(&session.refresh_token).await;
        self.settle_refresh(refreshed)
    }

    fn on_session_change(&self) -> Subscription {
        self.listeners.subscribe()
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let text = self
            .post_checked(&self.config.auth_url("token?grant_type=password"), None, &body)
            .await?;
        let session = parse_session(&text)?;
        self.store_session(Some(&session));
        self.listeners.emit(SessionEvent::SignedIn, Some(session));
        Ok(())
    }

    async fn sign_up(&self, email: &str, password: &str, metadata: &SignUpMetadata) -> Result<(), AuthError> {
        let body = sign_up_body(email, password, metadata);
        let text = self.post_checked(&self.config.auth_url("signup"), None, &body).await?;
        // With email confirmation enabled the response is a bare user and no
        // session exists until the address is confirmed.
        if let Some(session) = parse_sign_up(&text)? {
            self.store_session(Some(&session));
            self.listeners.emit(SessionEvent::SignedIn, Some(session));
        }
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if let Some(session) = self.current_session() {
            let (status, text) = self
                .post(&self.config.auth_url("logout"), Some(&session.access_token), &serde_json::json!({}))
                .await?;
            if !is_signed_out_status(status) {
                return Err(AuthError::Rejected(error_message(status, &text)));
            }
        }
        self.store_session(None);
        self.listeners.emit(SessionEvent::SignedOut, None);
        Ok(())
    }
}

#[async_trait::async_trait(?Send)]
impl ProfileStore for SupabaseClient {
    async fn find_profile_by_id(&self, id: &str) -> Result<ProfileRow, ProfileError> {
        let rows = self.get_rows(&self.config.rest_url(&profile_query(id))).await?;
        single_row(id, rows)
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Sign-out succeeded, or the session was already gone server-side.
fn is_signed_out_status(status: u16) -> bool {
    is_success(status) || matches!(status, 401 | 403 | 404)
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

/// Extract the user-facing message from a GoTrue / PostgREST error body.
fn error_message(status: u16, body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .error_description
        .or(parsed.msg)
        .or(parsed.message)
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("request failed with status {status}"))
}

fn parse_session(body: &str) -> Result<Session, AuthError> {
    serde_json::from_str(body).map_err(|e| AuthError::Decode(e.to_string()))
}

/// Sign-up returns a session only when no confirmation step is pending.
fn parse_sign_up(body: &str) -> Result<Option<Session>, AuthError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| AuthError::Decode(e.to_string()))?;
    if value.get("access_token").is_none() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| AuthError::Decode(e.to_string()))
}

fn sign_up_body(email: &str, password: &str, metadata: &SignUpMetadata) -> serde_json::Value {
    serde_json::json!({
        "email": email,
        "password": password,
        "data": {
            "full_name": metadata.full_name,
            "role": metadata.role,
        },
    })
}

/// Characters left as-is in a PostgREST filter value; everything else is
/// percent-encoded.
const FILTER_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

fn profile_query(id: &str) -> String {
    format!("users?id=eq.{}&select=*", utf8_percent_encode(id, FILTER_VALUE))
}

#[cfg(feature = "csr")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn now_secs() -> i64 {
    #[cfg(feature = "csr")]
    {
        (js_sys::Date::now() / 1000.0) as i64
    }
    #[cfg(not(feature = "csr"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_secs() as i64)
    }
}
