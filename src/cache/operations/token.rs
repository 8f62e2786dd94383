use std::sync::Arc;

use crate::cache::keys::{AUTH_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::error::StoreError;
use crate::store::KeyValueStore;

/// Persisted access/refresh token pair.
#[derive(Clone)]
pub struct TokenCacheOperations {
    store: Arc<dyn KeyValueStore>,
}

impl TokenCacheOperations {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Saves the access token and, when given, the refresh token
    pub async fn cache_tokens(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<(), StoreError> {
        self.store.set(AUTH_TOKEN_KEY, access_token).await?;
        if let Some(refresh_token) = refresh_token {
            self.store.set(REFRESH_TOKEN_KEY, refresh_token).await?;
        }
        Ok(())
    }

    pub async fn get_access_token(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .store
            .get(AUTH_TOKEN_KEY)
            .await?
            .filter(|token| !token.is_empty()))
    }

    pub async fn get_refresh_token(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .store
            .get(REFRESH_TOKEN_KEY)
            .await?
            .filter(|token| !token.is_empty()))
    }

    /// Removes both tokens
    pub async fn remove_tokens(&self) -> Result<(), StoreError> {
        self.store.remove(AUTH_TOKEN_KEY).await?;
        self.store.remove(REFRESH_TOKEN_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn round_trips_token_pair() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let tokens = TokenCacheOperations::new(store.clone());

        tokens.cache_tokens("access", Some("refresh")).await.unwrap();
        assert_eq!(store.get("auth_token").await.unwrap().as_deref(), Some("access"));
        assert_eq!(tokens.get_refresh_token().await.unwrap().as_deref(), Some("refresh"));

        tokens.remove_tokens().await.unwrap();
        assert_eq!(tokens.get_access_token().await.unwrap(), None);
        assert_eq!(tokens.get_refresh_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_token_reads_as_absent() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set("auth_token", "").await.unwrap();
        let tokens = TokenCacheOperations::new(store);
        assert_eq!(tokens.get_access_token().await.unwrap(), None);
    }
}
