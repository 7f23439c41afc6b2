use super::ApiResult;
use crate::domain_model::{Credentials, RefreshToken, RefreshedAccess, TokenPair, User};
use tokio::sync::broadcast;

#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /api/token/`
    async fn obtain_tokens(&self, credentials: &Credentials) -> ApiResult<TokenPair>;
    /// `POST /api/token/refresh/`
    async fn refresh_access(&self, refresh: &RefreshToken) -> ApiResult<RefreshedAccess>;
    /// `GET /api/profiles/me/`
    async fn fetch_profile(&self) -> ApiResult<User>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// A refresh attempt failed and the stored tokens were wiped.
    SessionExpired,
}

/// Fan-out of authentication events from the HTTP layer to whoever holds session state.
#[derive(Debug, Clone)]
pub struct AuthEvents {
    tx: broadcast::Sender<AuthEvent>,
}

impl AuthEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    pub fn emit(&self, event: AuthEvent) {
        // no subscribers is fine
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.tx.subscribe()
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}
