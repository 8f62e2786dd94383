use crate::api::ApiClient;
use crate::api::models::PlaceDetail;
use crate::error::ApiError;
use crate::hydrate::{Cancellation, HydrateOptions, hydrate_place_details};
use crate::screen::{Route, ScreenController, ScreenState, SelectedPlace};

/// Places listed at most; the rest of the activity summary is ignored.
pub const MAX_LISTED_PLACES: usize = 30;

/// The user's saved places, each hydrated into a full detail with insight.
pub struct PlaceListScreen {
    client: ApiClient,
    lookback_days: u32,
    options: HydrateOptions,
    cancel: Cancellation,
    places: ScreenController<Vec<PlaceDetail>>,
}

impl PlaceListScreen {
    pub fn new(client: ApiClient, lookback_days: u32, options: HydrateOptions) -> Self {
        Self {
            client,
            lookback_days,
            options: HydrateOptions {
                include_insight: true,
                ..options
            },
            cancel: Cancellation::new(),
            places: ScreenController::new(),
        }
    }

    pub fn state(&self) -> ScreenState<Vec<PlaceDetail>> {
        self.places.state()
    }

    pub fn places(&self) -> Vec<PlaceDetail> {
        self.places.data().unwrap_or_default()
    }

    pub async fn load(&self) -> Option<Result<Vec<PlaceDetail>, ApiError>> {
        self.places.load(self.fetch_places()).await
    }

    /// Stops outstanding detail fetches; call when the screen goes away.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    /// Opens the map focused on `detail`.
    pub fn select(&self, detail: &PlaceDetail) -> Route {
        Route::Map {
            focus: SelectedPlace::from_detail(detail),
        }
    }

    async fn fetch_places(&self) -> Result<Vec<PlaceDetail>, ApiError> {
        let activity = self
            .client
            .my_activity(self.lookback_days)
            .await
            .into_result()?;
        let ids: Vec<i64> = activity
            .into_combined()
            .into_iter()
            .take(MAX_LISTED_PLACES)
            .map(|place| place.place_id)
            .collect();

        Ok(hydrate_place_details(&self.client, &ids, &self.options, Some(&self.cancel)).await)
    }
}
