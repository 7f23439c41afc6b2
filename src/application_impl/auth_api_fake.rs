use crate::application_port::*;
use crate::domain_model::*;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const FAKE_PASSWORD: &str = "secret";

/// In-memory stand-in for the auth endpoints.
///
/// Any username logs in with [`FAKE_PASSWORD`]; the profile step can be told to fail.
#[derive(Debug, Default)]
pub struct FakeAuthApi {
    last_username: Mutex<Option<String>>,
    profile_error: Mutex<Option<ApiError>>,
    profile_calls: AtomicUsize,
}

impl FakeAuthApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_profile_with(&self, error: ApiError) {
        if let Ok(mut slot) = self.profile_error.lock() {
            *slot = Some(error);
        }
    }

    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AuthApi for FakeAuthApi {
    async fn obtain_tokens(&self, credentials: &Credentials) -> ApiResult<TokenPair> {
        if credentials.password != FAKE_PASSWORD {
            return Err(ApiError::InvalidCredentials);
        }
        if let Ok(mut slot) = self.last_username.lock() {
            *slot = Some(credentials.username.clone());
        }
        Ok(TokenPair {
            access: AccessToken(format!("fake-access-token:{}", credentials.username)),
            refresh: RefreshToken(format!("fake-refresh-token:{}", credentials.username)),
        })
    }

    async fn refresh_access(&self, refresh: &RefreshToken) -> ApiResult<RefreshedAccess> {
        match refresh.0.strip_prefix("fake-refresh-token:") {
            Some(username) => Ok(RefreshedAccess {
                access: AccessToken(format!("fake-access-token:{}", username)),
                refresh: None,
            }),
            None => Err(ApiError::Unauthorized("Token is invalid or expired".to_string())),
        }
    }

    async fn fetch_profile(&self) -> ApiResult<User> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.profile_error.lock().ok().and_then(|slot| slot.clone()) {
            return Err(error);
        }
        let username = self
            .last_username
            .lock()
            .ok()
            .and_then(|slot| slot.clone())
            .unwrap_or_else(|| "returning-guest".to_string());
        Ok(fake_user(&username))
    }
}

pub fn fake_user(username: &str) -> User {
    User {
        user_id: UserId(uuid::Uuid::new_v5(
            &uuid::Uuid::NAMESPACE_OID,
            username.as_bytes(),
        )),
        username: Some(username.to_string()),
        email: Some(format!("{}@example.com", username)),
        first_name: None,
        last_name: None,
        phone_number: None,
        role: Role::Guest,
        email_verified: true,
        created_at: None,
    }
}
