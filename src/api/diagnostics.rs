//! Connectivity probes run by the diagnostic binary.

use std::future::Future;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::api::client::ApiClient;
use crate::api::models::{ApiResponse, NearbyPlacesQuery};
use crate::utils::status_codes;

/// Seoul City Hall
pub const DEFAULT_PROBE_LAT: f64 = 37.5665;
pub const DEFAULT_PROBE_LNG: f64 = 126.9780;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub endpoint: String,
    pub success: bool,
    pub response_time: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Probes health, the caller's places and nearby places, in that order.
pub async fn run_all(client: &ApiClient) -> Vec<ProbeResult> {
    vec![
        probe_health(client).await,
        probe_user_places(client).await,
        probe_nearby(client, DEFAULT_PROBE_LAT, DEFAULT_PROBE_LNG).await,
    ]
}

pub async fn probe_health(client: &ApiClient) -> ProbeResult {
    let started = Instant::now();
    let healthy = client.health_check().await;
    ProbeResult {
        endpoint: "Health Check".to_string(),
        success: healthy,
        response_time: started.elapsed(),
        error: (!healthy).then(|| "Server is not healthy".to_string()),
    }
}

pub async fn probe_user_places(client: &ApiClient) -> ProbeResult {
    timed("GET /places", client.user_places()).await
}

pub async fn probe_nearby(client: &ApiClient, lat: f64, lng: f64) -> ProbeResult {
    let query = NearbyPlacesQuery {
        lat: Some(lat),
        lng: Some(lng),
        size: Some(10),
        ..NearbyPlacesQuery::default()
    };
    timed("GET /places/nearby", client.nearby_places(&query)).await
}

async fn timed<T>(endpoint: &str, call: impl Future<Output = ApiResponse<T>>) -> ProbeResult {
    let started = Instant::now();
    let response = call.await;
    let success = response.code == status_codes::OK;
    ProbeResult {
        endpoint: endpoint.to_string(),
        success,
        response_time: started.elapsed(),
        error: (!success).then_some(response.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn timed_reports_envelope_message_on_failure() {
        let result = timed("GET /x", async {
            ApiResponse::<()>::failure(503, "Service Unavailable")
        })
        .await;
        assert!(!result.success);
        assert_eq!(result.endpoint, "GET /x");
        assert_eq!(result.error.as_deref(), Some("Service Unavailable"));
    }

    #[tokio::test]
    async fn timed_treats_200_as_success() {
        let result = timed("GET /x", async { ApiResponse::success(1) }).await;
        assert!(result.success);
        assert!(result.error.is_none());
    }
}
