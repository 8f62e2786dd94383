use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::api::envelope;
use crate::api::models::ApiResponse;
use crate::auth::AuthContext;
use crate::config::Config;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Single gateway to the backend.
///
/// Every call resolves to an [`ApiResponse`]; transport, status and decoding
/// failures are folded into the envelope instead of being returned as errors.
/// Cloning is cheap and clones share the connection pool and auth context.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    health_check_url: String,
    health_check_timeout: Duration,
    auth: Arc<AuthContext>,
}

impl ApiClient {
    pub fn new(config: &Config, auth: Arc<AuthContext>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            health_check_url: config.health_check_url.clone(),
            health_check_timeout: config.health_check_timeout(),
            auth,
        })
    }

    pub fn auth(&self) -> &Arc<AuthContext> {
        &self.auth
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn health_check_url(&self) -> &str {
        &self.health_check_url
    }

    pub(crate) fn health_check_timeout(&self) -> Duration {
        self.health_check_timeout
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Sends one request to `path` under the base URL. `build` adds query
    /// parameters or a body.
    pub(crate) async fn request<T, F>(&self, method: Method, path: &str, build: F) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let request_id = Uuid::new_v4();
        let url = format!("{}{}", self.base_url, path);

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if let Some(token) = self.auth.token().await {
            builder = builder.bearer_auth(token);
        }
        let builder = build(builder);

        let started = Instant::now();
        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(%request_id, %method, path, "API request failed: {}", err);
                return envelope::transport_failure(&err);
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                tracing::error!(%request_id, %method, path, "Failed to read response body: {}", err);
                return envelope::transport_failure(&err);
            }
        };

        let envelope = envelope::normalize::<T>(status, &body);
        tracing::debug!(
            %request_id,
            %method,
            path,
            status = status.as_u16(),
            code = envelope.code,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "API request completed"
        );
        envelope
    }
}
