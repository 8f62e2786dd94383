//! Session token lifecycle.
//!
//! [`AuthContext`] is created once and handed to the API client, so every
//! request reads the token from the same place. Tokens are written through to
//! storage as soon as they change.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::api::models::{ApiResponse, RefreshTokenResponse};
use crate::cache::TokenCacheOperations;
use crate::error::ApiError;
use crate::store::KeyValueStore;
use crate::utils::status_codes;

mod claims;

pub use claims::{TokenClaims, decode_unverified};

/// Exchanges a refresh token for a new access token.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> ApiResponse<RefreshTokenResponse>;
}

pub struct AuthContext {
    tokens: TokenCacheOperations,
    access_token: RwLock<Option<String>>,
}

impl AuthContext {
    /// Starts signed out, without reading storage.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            tokens: TokenCacheOperations::new(store),
            access_token: RwLock::new(None),
        }
    }

    /// Loads a previously persisted token. Storage failures are logged and
    /// treated as signed out.
    pub async fn restore(store: Arc<dyn KeyValueStore>) -> Self {
        let context = Self::new(store);
        match context.tokens.get_access_token().await {
            Ok(token) => {
                tracing::debug!("Restored session token: {}", token.is_some());
                *context.access_token.write().await = token;
            }
            Err(err) => tracing::warn!("Failed to read stored token: {}", err),
        }
        context
    }

    pub async fn token(&self) -> Option<String> {
        self.access_token.read().await.clone()
    }

    pub async fn is_signed_in(&self) -> bool {
        self.access_token.read().await.is_some()
    }

    pub async fn refresh_token(&self) -> Option<String> {
        match self.tokens.get_refresh_token().await {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!("Failed to read refresh token: {}", err);
                None
            }
        }
    }

    /// Replaces the session. The in-memory token is updated even when
    /// persisting it fails, so the current run stays signed in.
    pub async fn store_session(&self, access_token: &str, refresh_token: Option<&str>) {
        *self.access_token.write().await = Some(access_token.to_string());
        if let Err(err) = self.tokens.cache_tokens(access_token, refresh_token).await {
            tracing::error!("Failed to persist session token: {}", err);
        }
    }

    /// Signs out: forgets and deletes both tokens.
    pub async fn clear(&self) {
        *self.access_token.write().await = None;
        if let Err(err) = self.tokens.remove_tokens().await {
            tracing::error!("Failed to remove stored tokens: {}", err);
        }
    }

    pub async fn claims(&self) -> Option<TokenClaims> {
        self.token().await.as_deref().and_then(decode_unverified)
    }

    /// Runs one explicit refresh through `refresher`. Nothing retries.
    pub async fn refresh_with(&self, refresher: &dyn TokenRefresher) -> Result<(), ApiError> {
        let Some(refresh_token) = self.refresh_token().await else {
            return Err(ApiError::new(
                status_codes::UNAUTHORIZED,
                "No refresh token stored",
            ));
        };

        let refreshed = refresher.refresh(&refresh_token).await.into_result()?;
        let next_refresh = refreshed.refresh_token.as_deref().unwrap_or(&refresh_token);
        self.store_session(&refreshed.access_token, Some(next_refresh))
            .await;
        tracing::info!("Session token refreshed");
        Ok(())
    }
}
