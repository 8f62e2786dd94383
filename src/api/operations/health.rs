// Backend liveness probe

use crate::api::client::ApiClient;

impl ApiClient {
    /// GET on the health URL, bounded by the health-check timeout.
    ///
    /// Bypasses the envelope: any 2xx is healthy, anything else (including a
    /// timeout) is not.
    pub async fn health_check(&self) -> bool {
        let result = self
            .http()
            .get(self.health_check_url())
            .timeout(self.health_check_timeout())
            .send()
            .await;

        match result {
            Ok(response) => {
                let healthy = response.status().is_success();
                if !healthy {
                    tracing::warn!(status = response.status().as_u16(), "Health check returned non-success status");
                }
                healthy
            }
            Err(err) => {
                tracing::warn!("Health check failed: {}", err);
                false
            }
        }
    }
}
