use crate::application_port::{ApiError, ApiResult, AuthApi, AuthEvent, AuthEvents};
use crate::domain_model::{Credentials, User};
use crate::infra::TokenVault;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    pub authenticated: bool,
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Anonymous,
    Loading,
    Authenticated,
    Error,
}

impl Session {
    pub fn state(&self) -> SessionState {
        if self.loading {
            SessionState::Loading
        } else if self.authenticated {
            SessionState::Authenticated
        } else if self.error.is_some() {
            SessionState::Error
        } else {
            SessionState::Anonymous
        }
    }

    fn signed_in(user: User) -> Self {
        Session {
            authenticated: true,
            user: Some(user),
            loading: false,
            error: None,
        }
    }

    fn failed(error: &ApiError) -> Self {
        Session {
            error: Some(error.to_string()),
            ..Session::default()
        }
    }
}

/// Who is signed in, shared by every page.
///
/// Construct once at start-up (inside a tokio runtime) and call
/// [`SessionContext::shutdown`] on the way out. A refresh failure reported on
/// [`AuthEvents`] drops the user but keeps any pending error message.
pub struct SessionContext {
    auth: Arc<dyn AuthApi>,
    vault: TokenVault,
    state: Arc<watch::Sender<Session>>,
    cancel: CancellationToken,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl SessionContext {
    pub fn new(auth: Arc<dyn AuthApi>, vault: TokenVault, events: &AuthEvents) -> Self {
        let (state, _) = watch::channel(Session::default());
        let state = Arc::new(state);
        let cancel = CancellationToken::new();
        let listener = tokio::spawn(listen_for_expiry(
            events.subscribe(),
            state.clone(),
            cancel.clone(),
        ));

        Self {
            auth,
            vault,
            state,
            cancel,
            listener: Mutex::new(Some(listener)),
        }
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Restores a persisted session: a stored access token is trusted until the profile fetch says otherwise.
    pub async fn initialize(&self) -> Session {
        match self.vault.has_access_token().await {
            Ok(true) => {
                self.state.send_replace(Session {
                    authenticated: true,
                    loading: true,
                    ..Session::default()
                });
                match self.auth.fetch_profile().await {
                    Ok(user) => {
                        info!(user = %user.display_name(), "session restored");
                        self.state.send_replace(Session::signed_in(user));
                    }
                    Err(e) => {
                        warn!(error = %e, "stored session could not be restored");
                        self.state.send_replace(Session::default());
                    }
                }
            }
            Ok(false) => {
                self.state.send_replace(Session::default());
            }
            Err(e) => {
                warn!(error = %e, "token storage unreadable, starting anonymous");
                self.state.send_replace(Session::default());
            }
        }
        self.snapshot()
    }

    /// Obtains a token pair, stores it, then loads the profile.
    ///
    /// If the profile step fails the login is reported as failed, but the tokens
    /// from the first step stay stored.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<User> {
        self.state.send_modify(|session| {
            session.loading = true;
            session.error = None;
        });

        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        match self.sign_in(&credentials).await {
            Ok(user) => {
                info!(user = %user.display_name(), "logged in");
                self.state.send_replace(Session::signed_in(user.clone()));
                Ok(user)
            }
            Err(e) => {
                warn!(username, error = %e, "login failed");
                self.state.send_replace(Session::failed(&e));
                Err(e)
            }
        }
    }

    async fn sign_in(&self, credentials: &Credentials) -> ApiResult<User> {
        let pair = self.auth.obtain_tokens(credentials).await?;
        self.vault.save_pair(&pair).await?;
        self.auth.fetch_profile().await
    }

    /// Forgets both tokens and the user. The session is reset even if storage fails.
    pub async fn logout(&self) -> ApiResult<()> {
        let cleared = self.vault.clear().await;
        self.state.send_replace(Session::default());
        info!("logged out");
        cleared.map_err(ApiError::from)
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|session| session.error = None);
    }

    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let handle = self.listener.lock().ok().and_then(|mut slot| slot.take());
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "session listener ended abnormally");
            }
        }
    }
}

impl Drop for SessionContext {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn listen_for_expiry(
    mut events: broadcast::Receiver<AuthEvent>,
    state: Arc<watch::Sender<Session>>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            event = events.recv() => match event {
                Ok(AuthEvent::SessionExpired) => {
                    state.send_if_modified(|session| {
                        if !session.authenticated && session.user.is_none() {
                            return false;
                        }
                        info!("session expired, signing out");
                        session.authenticated = false;
                        session.user = None;
                        session.loading = false;
                        true
                    });
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::{FAKE_PASSWORD, FakeAuthApi};
    use crate::infra::MemoryStore;
    use std::time::Duration;

    struct Harness {
        auth: Arc<FakeAuthApi>,
        store: Arc<MemoryStore>,
        vault: TokenVault,
        events: AuthEvents,
        session: SessionContext,
    }

    fn harness() -> Harness {
        let auth = Arc::new(FakeAuthApi::new());
        let store = Arc::new(MemoryStore::new());
        let vault = TokenVault::new(store.clone());
        let events = AuthEvents::new();
        let session = SessionContext::new(auth.clone(), vault.clone(), &events);
        Harness {
            auth,
            store,
            vault,
            events,
            session,
        }
    }

    #[tokio::test]
    async fn login_stores_tokens_and_loads_profile() {
        let h = harness();
        let user = h.session.login("amina", FAKE_PASSWORD).await.unwrap();
        assert_eq!(user.username.as_deref(), Some("amina"));

        let session = h.session.snapshot();
        assert_eq!(session.state(), SessionState::Authenticated);
        assert_eq!(session.user, Some(user));
        assert!(h.vault.has_access_token().await.unwrap());
        h.session.shutdown().await;
    }

    #[tokio::test]
    async fn failed_login_leaves_anonymous_with_error_until_cleared() {
        let h = harness();
        let err = h.session.login("amina", "wrong").await.unwrap_err();
        assert_eq!(err, ApiError::InvalidCredentials);

        let session = h.session.snapshot();
        assert!(!session.authenticated);
        assert!(!session.loading);
        assert!(session.error.as_deref().is_some_and(|m| !m.is_empty()));
        assert_eq!(session.state(), SessionState::Error);

        h.session.clear_error();
        let session = h.session.snapshot();
        assert_eq!(session.error, None);
        assert!(!session.authenticated);
        assert_eq!(session.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn clear_error_keeps_authentication() {
        let h = harness();
        h.session.login("amina", FAKE_PASSWORD).await.unwrap();
        h.session.clear_error();
        assert!(h.session.snapshot().authenticated);
    }

    #[tokio::test]
    async fn profile_failure_fails_login_but_keeps_tokens() {
        let h = harness();
        h.auth
            .fail_profile_with(ApiError::Server { status: 503, message: "down".to_string() });

        assert!(h.session.login("amina", FAKE_PASSWORD).await.is_err());
        assert!(!h.session.snapshot().authenticated);
        assert!(h.vault.has_access_token().await.unwrap());
        assert!(h.vault.refresh_token().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn logout_wipes_tokens_and_session() {
        let h = harness();
        h.session.login("amina", FAKE_PASSWORD).await.unwrap();
        h.session.logout().await.unwrap();

        assert!(h.store.is_empty());
        assert_eq!(h.session.snapshot().state(), SessionState::Anonymous);
        assert_eq!(h.session.snapshot().user, None);
    }

    #[tokio::test]
    async fn initialize_without_token_stays_anonymous() {
        let h = harness();
        let session = h.session.initialize().await;
        assert_eq!(session.state(), SessionState::Anonymous);
        assert_eq!(h.auth.profile_calls(), 0);
    }

    #[tokio::test]
    async fn initialize_with_token_restores_or_falls_back() {
        let h = harness();
        h.vault
            .save_access(&crate::domain_model::AccessToken("stored".to_string()))
            .await
            .unwrap();
        let session = h.session.initialize().await;
        assert_eq!(session.state(), SessionState::Authenticated);
        assert_eq!(h.auth.profile_calls(), 1);

        h.auth.fail_profile_with(ApiError::SessionExpired);
        let session = h.session.initialize().await;
        assert_eq!(session.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn expiry_event_signs_out() {
        let h = harness();
        h.session.login("amina", FAKE_PASSWORD).await.unwrap();

        let mut rx = h.session.subscribe();
        h.events.emit(AuthEvent::SessionExpired);
        tokio::time::timeout(Duration::from_secs(1), rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert!(!h.session.snapshot().authenticated);
        h.session.shutdown().await;
    }

    #[tokio::test]
    async fn late_expiry_event_keeps_the_login_error() {
        let h = harness();
        h.session.login("amina", "wrong").await.unwrap_err();

        h.events.emit(AuthEvent::SessionExpired);
        tokio::time::sleep(Duration::from_millis(20)).await;

        let session = h.session.snapshot();
        assert_eq!(session.state(), SessionState::Error);
        assert!(session.error.as_deref().is_some_and(|m| !m.is_empty()));
        h.session.shutdown().await;
    }
}
