use serde::{Deserialize, Serialize};

/// A visited place as classified by the activity summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPlace {
    pub place_id: i64,
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub is_closed: bool,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub distance_m: f64,
}

/// Frequent and dormant buckets, as returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityResponse {
    #[serde(default)]
    pub frequent: Vec<ActivityPlace>,
    #[serde(default)]
    pub dormant: Vec<ActivityPlace>,
}

impl ActivityResponse {
    /// Frequent places first, then dormant ones.
    pub fn into_combined(self) -> Vec<ActivityPlace> {
        let mut places = self.frequent;
        places.extend(self.dormant);
        places
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityQuery {
    pub lookback_days: u32,
}
