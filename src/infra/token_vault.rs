use crate::domain_model::{AccessToken, RefreshToken, TokenPair};
use crate::domain_port::{LocalStore, StoreError};
use std::sync::Arc;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// The token pair as kept in local storage under fixed keys.
#[derive(Clone)]
pub struct TokenVault {
    store: Arc<dyn LocalStore>,
}

impl TokenVault {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    pub async fn access_token(&self) -> Result<Option<AccessToken>, StoreError> {
        Ok(self
            .store
            .get(ACCESS_TOKEN_KEY)
            .await?
            .filter(|t| !t.is_empty())
            .map(AccessToken))
    }

    pub async fn refresh_token(&self) -> Result<Option<RefreshToken>, StoreError> {
        Ok(self
            .store
            .get(REFRESH_TOKEN_KEY)
            .await?
            .filter(|t| !t.is_empty())
            .map(RefreshToken))
    }

    pub async fn has_access_token(&self) -> Result<bool, StoreError> {
        Ok(self.access_token().await?.is_some())
    }

    pub async fn save_pair(&self, pair: &TokenPair) -> Result<(), StoreError> {
        self.store.set(ACCESS_TOKEN_KEY, &pair.access.0).await?;
        self.store.set(REFRESH_TOKEN_KEY, &pair.refresh.0).await
    }

    pub async fn save_access(&self, token: &AccessToken) -> Result<(), StoreError> {
        self.store.set(ACCESS_TOKEN_KEY, &token.0).await
    }

    pub async fn save_refresh(&self, token: &RefreshToken) -> Result<(), StoreError> {
        self.store.set(REFRESH_TOKEN_KEY, &token.0).await
    }

    /// Removes both tokens; the refresh token goes even if the first removal fails.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let access = self.store.remove(ACCESS_TOKEN_KEY).await;
        let refresh = self.store.remove(REFRESH_TOKEN_KEY).await;
        access.and(refresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MemoryStore;

    #[tokio::test]
    async fn pair_round_trip_and_clear() {
        let store = Arc::new(MemoryStore::new());
        let vault = TokenVault::new(store.clone());
        assert!(!vault.has_access_token().await.unwrap());

        vault
            .save_pair(&TokenPair {
                access: AccessToken("a-1".to_string()),
                refresh: RefreshToken("r-1".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(vault.access_token().await.unwrap(), Some(AccessToken("a-1".to_string())));
        assert_eq!(store.len(), 2);

        vault.save_access(&AccessToken("a-2".to_string())).await.unwrap();
        assert_eq!(vault.access_token().await.unwrap(), Some(AccessToken("a-2".to_string())));

        vault.clear().await.unwrap();
        assert!(store.is_empty());
        assert_eq!(vault.refresh_token().await.unwrap(), None);
    }
}
