use crate::application_port::{ApiError, ApiResult, AuthEvent, AuthEvents};
use crate::domain_model::{AccessToken, RefreshToken, RefreshedAccess};
use crate::infra::TokenVault;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const TOKEN_PATH: &str = "/api/token/";
pub const TOKEN_REFRESH_PATH: &str = "/api/token/refresh/";

/// A request kept as plain data so it can be replayed after a token refresh.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    authenticated: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            authenticated: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> ApiResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::validation(format!("could not encode request: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    /// No bearer token and no refresh-on-401; used by the token endpoints themselves.
    pub fn anonymous(mut self) -> Self {
        self.authenticated = false;
        self
    }
}

/// A fully read response.
#[derive(Debug, Clone)]
pub struct ApiReply {
    pub status: u16,
    pub body: String,
}

impl ApiReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn error(&self) -> ApiError {
        ApiError::from_status(self.status, &self.body)
    }

    pub fn decode<T: DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Network(error.to_string())
        }
    }
}

pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
    vault: TokenVault,
    events: AuthEvents,
}

impl HttpClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        vault: TokenVault,
        events: AuthEvents,
    ) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("stayline/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            vault,
            events,
        })
    }

    async fn dispatch(&self, request: &ApiRequest) -> ApiResult<ApiReply> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.http.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if request.authenticated {
            if let Some(token) = self.vault.access_token().await? {
                builder = builder.bearer_auth(&token.0);
            }
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(method = %request.method, path = %request.path, status, "api call");
        Ok(ApiReply { status, body })
    }

    /// Sends `request`, refreshing the access token and replaying at most once on 401.
    ///
    /// A 401 on the replay is handed back as-is. A failed refresh wipes both tokens,
    /// announces [`AuthEvent::SessionExpired`] and yields [`ApiError::SessionExpired`].
    pub async fn execute(&self, request: ApiRequest) -> ApiResult<ApiReply> {
        let mut retried = false;
        loop {
            let reply = self.dispatch(&request).await?;
            if reply.status != 401 || !request.authenticated || retried {
                return Ok(reply);
            }
            retried = true;

            warn!(path = %request.path, "access token rejected, refreshing");
            match self.refresh_access_token().await {
                Ok(_) => debug!(path = %request.path, "replaying request with new token"),
                Err(e) => {
                    warn!(error = %e, "token refresh failed, clearing session");
                    self.expire_session().await;
                    return Err(ApiError::SessionExpired);
                }
            }
        }
    }

    /// Executes and decodes a JSON answer, normalizing any non-2xx into an [`ApiError`].
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        let reply = self.execute(request).await?;
        if !reply.is_success() {
            return Err(reply.error());
        }
        reply.decode()
    }

    /// Like [`HttpClient::send`] for endpoints whose body is irrelevant (e.g. 204).
    pub async fn send_empty(&self, request: ApiRequest) -> ApiResult<()> {
        let reply = self.execute(request).await?;
        if !reply.is_success() {
            return Err(reply.error());
        }
        Ok(())
    }

    /// Exchanges `refresh` for a new access token and stores what comes back.
    pub async fn exchange_refresh(&self, refresh: &RefreshToken) -> ApiResult<RefreshedAccess> {
        let request = ApiRequest::post(TOKEN_REFRESH_PATH)
            .anonymous()
            .json(&json!({ "refresh": refresh.0 }))?;
        let reply = self.dispatch(&request).await?;
        if !reply.is_success() {
            return Err(reply.error());
        }
        let refreshed: RefreshedAccess = reply.decode()?;
        self.vault.save_access(&refreshed.access).await?;
        if let Some(rotated) = &refreshed.refresh {
            self.vault.save_refresh(rotated).await?;
        }
        info!("access token refreshed");
        Ok(refreshed)
    }

    pub async fn refresh_access_token(&self) -> ApiResult<AccessToken> {
        let refresh = self
            .vault
            .refresh_token()
            .await?
            .ok_or(ApiError::SessionExpired)?;
        Ok(self.exchange_refresh(&refresh).await?.access)
    }

    async fn expire_session(&self) {
        if let Err(e) = self.vault.clear().await {
            warn!(error = %e, "could not clear stored tokens");
        }
        self.events.emit(AuthEvent::SessionExpired);
    }
}
