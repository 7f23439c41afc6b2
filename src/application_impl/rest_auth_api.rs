use super::RestApi;
use crate::application_port::*;
use crate::domain_model::{Credentials, RefreshToken, RefreshedAccess, TokenPair, User};
use crate::infra::{ApiRequest, TOKEN_PATH};

const PROFILE_PATH: &str = "/api/profiles/me/";

#[async_trait::async_trait]
impl AuthApi for RestApi {
    async fn obtain_tokens(&self, credentials: &Credentials) -> ApiResult<TokenPair> {
        let request = ApiRequest::post(TOKEN_PATH).anonymous().json(credentials)?;
        self.http.send(request).await.map_err(|e| match e {
            ApiError::Unauthorized(_) => ApiError::InvalidCredentials,
            other => other,
        })
    }

    async fn refresh_access(&self, refresh: &RefreshToken) -> ApiResult<RefreshedAccess> {
        self.http.exchange_refresh(refresh).await
    }

    async fn fetch_profile(&self) -> ApiResult<User> {
        self.http.send(ApiRequest::get(PROFILE_PATH)).await
    }
}
