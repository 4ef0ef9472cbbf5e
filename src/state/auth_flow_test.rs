use super::*;
use crate::net::profile::{ProfileError, single_row};
use crate::net::session::SessionListeners;
use crate::net::types::{ProfileRow, Role, SessionUser, User};
use std::sync::Mutex;
use tokio::sync::Notify;

// =========================================================================
// Fixtures
// =========================================================================

fn session(user_id: &str) -> Session {
    Session {
        access_token: format!("at-{user_id}"),
        refresh_token: "rt".to_owned(),
        expires_at: None,
        user: SessionUser { id: user_id.to_owned(), email: Some(format!("{user_id}@example.com")) },
    }
}

fn row(user_id: &str, role: Role) -> ProfileRow {
    ProfileRow {
        id: user_id.to_owned(),
        email: format!("{user_id}@example.com"),
        full_name: "Ada Lovelace".to_owned(),
        role,
        created_at: None,
    }
}

fn user(user_id: &str, role: Role) -> User {
    User::from(row(user_id, role))
}

/// Sink that applies actions to a plain state and keeps the action log.
#[derive(Clone, Default)]
struct RecordingStore {
    state: Arc<Mutex<AuthState>>,
    actions: Arc<Mutex<Vec<AuthAction>>>,
}

impl RecordingStore {
    fn snapshot(&self) -> AuthState {
        self.state.lock().unwrap().clone()
    }

    fn actions(&self) -> Vec<AuthAction> {
        self.actions.lock().unwrap().clone()
    }
}

impl AuthSink for RecordingStore {
    fn dispatch(&self, action: AuthAction) {
        self.actions.lock().unwrap().push(action.clone());
        self.state.lock().unwrap().apply(action);
    }
}

// =========================================================================
// MockSession
// =========================================================================

struct MockSession {
    current: Mutex<Result<Option<Session>, AuthError>>,
    sign_in: Mutex<Result<(), AuthError>>,
    sign_in_gate: Mutex<Option<Arc<Notify>>>,
    sign_up: Mutex<Result<(), AuthError>>,
    sign_out: Mutex<Result<(), AuthError>>,
    sign_up_calls: Mutex<Vec<(String, SignUpMetadata)>>,
    listeners: SessionListeners,
}

impl MockSession {
    fn new(current: Option<Session>) -> Self {
        Self {
            current: Mutex::new(Ok(current)),
            sign_in: Mutex::new(Ok(())),
            sign_in_gate: Mutex::new(None),
            sign_up: Mutex::new(Ok(())),
            sign_out: Mutex::new(Ok(())),
            sign_up_calls: Mutex::new(Vec::new()),
            listeners: SessionListeners::new(),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl SessionClient for MockSession {
    async fn get_current_session(&self) -> Result<Option<Session>, AuthError> {
        self.current.lock().unwrap().clone()
    }

    fn on_session_change(&self) -> Subscription {
        self.listeners.subscribe()
    }

    async fn sign_in_with_password(&self, _email: &str, _password: &str) -> Result<(), AuthError> {
        let gate = self.sign_in_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.sign_in.lock().unwrap().clone()
    }

    async fn sign_up(&self, email: &str, _password: &str, metadata: &SignUpMetadata) -> Result<(), AuthError> {
        self.sign_up_calls.lock().unwrap().push((email.to_owned(), metadata.clone()));
        self.sign_up.lock().unwrap().clone()
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.sign_out.lock().unwrap().clone()
    }
}

// =========================================================================
// MockProfiles
// =========================================================================

struct MockProfiles {
    rows: Vec<ProfileRow>,
    gate: Option<Arc<Notify>>,
}

impl MockProfiles {
    fn new(rows: Vec<ProfileRow>) -> Self {
        Self { rows, gate: None }
    }
}

#[async_trait::async_trait(?Send)]
impl ProfileStore for MockProfiles {
    async fn find_profile_by_id(&self, id: &str) -> Result<ProfileRow, ProfileError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        single_row(id, self.rows.iter().filter(|r| r.id == id).cloned().collect())
    }
}

fn service(client: &Arc<MockSession>, profiles: MockProfiles) -> AuthService<RecordingStore> {
    AuthService::new(client.clone(), Arc::new(profiles), RecordingStore::default())
}

// =========================================================================
// bootstrap
// =========================================================================

#[tokio::test]
async fn bootstrap_with_session_resolves_user() {
    let client = Arc::new(MockSession::new(Some(session("u-1"))));
    let svc = service(&client, MockProfiles::new(vec![row("u-1", Role::ZohoAdmin)]));

    svc.bootstrap().await;

    let state = svc.sink().snapshot();
    assert!(state.is_authenticated);
    assert!(!state.is_loading);
    assert_eq!(state.user, Some(user("u-1", Role::ZohoAdmin)));
    assert_eq!(state.session, Some(session("u-1")));
    assert!(state.error.is_none());
}

#[tokio::test]
async fn bootstrap_without_session_only_clears_loading() {
    let client = Arc::new(MockSession::new(None));
    let svc = service(&client, MockProfiles::new(vec![]));

    svc.bootstrap().await;

    let state = svc.sink().snapshot();
    assert!(!state.is_authenticated);
    assert!(!state.is_loading);
    assert_eq!(svc.sink().actions(), vec![AuthAction::SetLoading(false)]);
}

#[tokio::test]
async fn bootstrap_profile_failure_sets_error_and_clears_loading() {
    let client = Arc::new(MockSession::new(Some(session("u-1"))));
    let svc = service(&client, MockProfiles::new(vec![]));

    svc.bootstrap().await;

    let state = svc.sink().snapshot();
    assert_eq!(state.error.as_deref(), Some(INIT_FAILED_MESSAGE));
    assert!(!state.is_loading);
    assert!(state.user.is_none());
    // Session transition already authenticated; no user transition followed.
    assert!(state.is_authenticated);
}

#[tokio::test]
async fn bootstrap_session_query_failure_sets_init_error() {
    let client = Arc::new(MockSession::new(None));
    *client.current.lock().unwrap() = Err(AuthError::Transport("offline".to_owned()));
    let svc = service(&client, MockProfiles::new(vec![]));

    svc.bootstrap().await;

    let state = svc.sink().snapshot();
    assert_eq!(state.error.as_deref(), Some(INIT_FAILED_MESSAGE));
    assert!(!state.is_loading);
    assert!(!state.is_authenticated);
}

// =========================================================================
// session changes
// =========================================================================

#[tokio::test]
async fn signed_in_change_sets_session_then_user() {
    let client = Arc::new(MockSession::new(None));
    let svc = service(&client, MockProfiles::new(vec![row("u-2", Role::DispatchCoordinator)]));

    svc.handle_change(SessionChange { event: SessionEvent::SignedIn, session: Some(session("u-2")) })
        .await;

    assert_eq!(
        svc.sink().actions(),
        vec![
            AuthAction::SetSession(Some(session("u-2"))),
            AuthAction::SetUser(Some(user("u-2", Role::DispatchCoordinator))),
        ]
    );
}

#[tokio::test]
async fn token_refreshed_profile_failure_records_error() {
    let client = Arc::new(MockSession::new(None));
    let svc = service(&client, MockProfiles::new(vec![]));

    svc.handle_change(SessionChange { event: SessionEvent::TokenRefreshed, session: Some(session("u-3")) })
        .await;

    let state = svc.sink().snapshot();
    assert_eq!(state.error.as_deref(), Some(PROFILE_FAILED_MESSAGE));
    assert_eq!(state.session, Some(session("u-3")));
}

#[tokio::test]
async fn signed_out_change_resets_state() {
    let client = Arc::new(MockSession::new(Some(session("u-1"))));
    let svc = service(&client, MockProfiles::new(vec![row("u-1", Role::ZohoAdmin)]));
    svc.bootstrap().await;

    svc.handle_change(SessionChange { event: SessionEvent::SignedOut, session: None }).await;

    assert_eq!(svc.sink().snapshot(), AuthState { is_loading: false, ..AuthState::default() });
}

#[tokio::test]
async fn unrelated_events_are_ignored() {
    let client = Arc::new(MockSession::new(None));
    let svc = service(&client, MockProfiles::new(vec![]));

    svc.handle_change(SessionChange { event: SessionEvent::UserUpdated, session: Some(session("u-1")) })
        .await;

    assert!(svc.sink().actions().is_empty());
}

#[tokio::test]
async fn listener_applies_changes_until_unsubscribed() {
    let client = Arc::new(MockSession::new(None));
    let svc = service(&client, MockProfiles::new(vec![row("u-1", Role::CsiFieldWorker)]));
    let subscription = svc.subscribe();
    let handle = subscription.handle();
    assert_eq!(client.listeners.len(), 1);

    let driver = async {
        client.listeners.emit(SessionEvent::SignedIn, Some(session("u-1")));
        tokio::task::yield_now().await;
        handle.unsubscribe();
    };
    tokio::join!(svc.listen(subscription), driver);

    assert!(client.listeners.is_empty());
    assert_eq!(svc.sink().snapshot().user, Some(user("u-1", Role::CsiFieldWorker)));
}

#[tokio::test]
async fn sign_out_during_pending_profile_load_discards_stale_user() {
    let client = Arc::new(MockSession::new(Some(session("u-1"))));
    let gate = Arc::new(Notify::new());
    let profiles = MockProfiles { rows: vec![row("u-1", Role::ZohoAdmin)], gate: Some(gate.clone()) };
    let svc = service(&client, profiles);

    let interleave = async {
        tokio::task::yield_now().await;
        svc.handle_change(SessionChange { event: SessionEvent::SignedOut, session: None }).await;
        gate.notify_one();
    };
    tokio::join!(svc.bootstrap(), interleave);

    let state = svc.sink().snapshot();
    assert!(!state.is_authenticated);
    assert!(state.user.is_none());
    assert!(state.session.is_none());
    assert!(!state.is_loading);
    assert!(!svc.sink().actions().iter().any(|a| matches!(a, AuthAction::SetUser(_))));
}

// =========================================================================
// credential operations
// =========================================================================

#[tokio::test]
async fn login_failure_records_message_and_returns_error() {
    let client = Arc::new(MockSession::new(None));
    *client.sign_in.lock().unwrap() = Err(AuthError::Rejected("Invalid login credentials".to_owned()));
    let svc = service(&client, MockProfiles::new(vec![]));

    let result = svc.login("a@b.com", "wrong").await;

    assert_eq!(result, Err(AuthError::Rejected("Invalid login credentials".to_owned())));
    let state = svc.sink().snapshot();
    assert_eq!(state.error.as_deref(), Some("Invalid login credentials"));
    assert!(!state.is_loading);
}

#[tokio::test]
async fn login_success_clears_previous_error() {
    let client = Arc::new(MockSession::new(None));
    let svc = service(&client, MockProfiles::new(vec![]));
    svc.sink().dispatch(AuthAction::SetError(Some("old".to_owned())));

    svc.login("a@b.com", "pw").await.unwrap();

    let actions = svc.sink().actions();
    assert_eq!(
        actions[1..],
        [AuthAction::SetLoading(true), AuthAction::SetError(None), AuthAction::SetLoading(false)]
    );
    assert!(svc.sink().snapshot().error.is_none());
}

#[tokio::test]
async fn dropped_login_still_clears_loading() {
    let client = Arc::new(MockSession::new(None));
    *client.sign_in_gate.lock().unwrap() = Some(Arc::new(Notify::new()));
    let svc = service(&client, MockProfiles::new(vec![]));

    // Poll the login once so it parks on the gate, then drop it.
    tokio::select! {
        biased;
        _ = svc.login("a@b.com", "pw") => panic!("sign-in should still be pending"),
        () = std::future::ready(()) => {}
    }

    assert!(!svc.sink().snapshot().is_loading);
    assert_eq!(
        svc.sink().actions(),
        vec![AuthAction::SetLoading(true), AuthAction::SetError(None), AuthAction::SetLoading(false)]
    );
}

#[tokio::test]
async fn sign_up_passes_metadata_and_propagates_failure() {
    let client = Arc::new(MockSession::new(None));
    *client.sign_up.lock().unwrap() = Err(AuthError::Rejected("User already registered".to_owned()));
    let svc = service(&client, MockProfiles::new(vec![]));
    let metadata = SignUpMetadata { full_name: "Ada".to_owned(), role: Role::ThfcProductionOperator };

    let result = svc.sign_up("a@b.com", "pw", &metadata).await;

    assert!(result.is_err());
    assert_eq!(*client.sign_up_calls.lock().unwrap(), vec![("a@b.com".to_owned(), metadata)]);
    let state = svc.sink().snapshot();
    assert_eq!(state.error.as_deref(), Some("User already registered"));
    assert!(!state.is_loading);
}

#[tokio::test]
async fn logout_success_resets_state() {
    let client = Arc::new(MockSession::new(Some(session("u-1"))));
    let svc = service(&client, MockProfiles::new(vec![row("u-1", Role::ZohoAdmin)]));
    svc.bootstrap().await;

    svc.logout().await;

    assert_eq!(svc.sink().snapshot(), AuthState { is_loading: false, ..AuthState::default() });
    assert_eq!(svc.sink().actions().last(), Some(&AuthAction::SetLoading(false)));
}

#[tokio::test]
async fn logout_failure_is_recorded_not_returned() {
    let client = Arc::new(MockSession::new(Some(session("u-1"))));
    *client.sign_out.lock().unwrap() = Err(AuthError::Transport("offline".to_owned()));
    let svc = service(&client, MockProfiles::new(vec![row("u-1", Role::ZohoAdmin)]));
    svc.bootstrap().await;

    svc.logout().await;

    let state = svc.sink().snapshot();
    assert_eq!(state.error.as_deref(), Some("request failed: offline"));
    assert!(state.is_authenticated);
    assert!(!state.is_loading);
}
