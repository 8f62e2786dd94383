// Session and user endpoints

use async_trait::async_trait;
use reqwest::Method;

use crate::api::client::ApiClient;
use crate::api::models::*;
use crate::auth::TokenRefresher;
use crate::config::endpoints;
use crate::error::ApiError;
use crate::utils::status_codes;

impl ApiClient {
    /// POST /users/login
    ///
    /// On a 200 with data the returned tokens become the current session.
    pub async fn login(&self, credentials: &LoginRequest) -> ApiResponse<LoginResponse> {
        let response: ApiResponse<LoginResponse> = self
            .request(Method::POST, endpoints::LOGIN, |builder| builder.json(credentials))
            .await;

        if response.code == status_codes::OK {
            if let Some(login) = &response.data {
                self.auth()
                    .store_session(&login.access_token, Some(login.refresh_token.as_str()))
                    .await;
                tracing::info!(user_id = login.user.id, "Signed in");
            }
        }
        response
    }

    /// POST /users/refresh-token, then stores the new session.
    pub async fn refresh_session(&self) -> Result<(), ApiError> {
        self.auth().refresh_with(self).await
    }

    /// Local sign-out; the backend keeps no session to end.
    pub async fn logout(&self) {
        self.auth().clear().await;
        tracing::info!("Signed out");
    }

    /// GET /users/me
    pub async fn my_info(&self) -> ApiResponse<UserInfo> {
        self.request(Method::GET, endpoints::USERS_ME, |builder| builder)
            .await
    }

    /// GET /users/lookup?userId=
    pub async fn lookup_user(&self, user_id: i64) -> ApiResponse<UserLookup> {
        let query = LookupQuery { user_id };
        self.request(Method::GET, endpoints::USERS_LOOKUP, |builder| {
            builder.query(&query)
        })
        .await
    }
}

#[async_trait]
impl TokenRefresher for ApiClient {
    async fn refresh(&self, refresh_token: &str) -> ApiResponse<RefreshTokenResponse> {
        let body = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.request(Method::POST, endpoints::REFRESH_TOKEN, |builder| {
            builder.json(&body)
        })
        .await
    }
}
