// Activity summary endpoint

use reqwest::Method;

use crate::api::client::ApiClient;
use crate::api::models::*;
use crate::config::endpoints;

impl ApiClient {
    /// GET /profile/me/activity?lookbackDays=
    ///
    /// Buckets come back separately; callers that want one working set use
    /// [`ActivityResponse::into_combined`].
    pub async fn my_activity(&self, lookback_days: u32) -> ApiResponse<ActivityResponse> {
        let query = ActivityQuery { lookback_days };
        self.request(Method::GET, endpoints::PROFILE_ACTIVITY, |builder| {
            builder.query(&query)
        })
        .await
    }
}
