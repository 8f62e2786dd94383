use crate::api::ApiClient;
use crate::api::models::{ActivityPlace, SearchPlace};
use crate::cache::RecentSearchCache;
use crate::error::ApiError;
use crate::screen::{Route, ScreenController, ScreenState};

/// Profile page: visited places plus recently searched ones.
pub struct MyPageScreen {
    client: ApiClient,
    recent: RecentSearchCache,
    lookback_days: u32,
    activity: ScreenController<Vec<ActivityPlace>>,
}

impl MyPageScreen {
    pub fn new(client: ApiClient, recent: RecentSearchCache, lookback_days: u32) -> Self {
        Self {
            client,
            recent,
            lookback_days,
            activity: ScreenController::new(),
        }
    }

    pub fn state(&self) -> ScreenState<Vec<ActivityPlace>> {
        self.activity.state()
    }

    pub fn controller(&self) -> &ScreenController<Vec<ActivityPlace>> {
        &self.activity
    }

    /// Frequent places followed by dormant ones.
    pub fn places(&self) -> Vec<ActivityPlace> {
        self.activity.data().unwrap_or_default()
    }

    /// Initial load, shown with the blocking spinner.
    pub async fn load(&self) -> Option<Result<Vec<ActivityPlace>, ApiError>> {
        self.activity.load(self.fetch_activity()).await
    }

    /// Pull-to-refresh. The current list stays visible, and stays put if the
    /// refresh fails.
    pub async fn refresh(&self) -> Option<Result<Vec<ActivityPlace>, ApiError>> {
        self.activity.refresh(self.fetch_activity()).await
    }

    pub fn is_refreshing(&self) -> bool {
        self.activity.state().is_refreshing()
    }

    /// Re-read from storage on every call.
    pub async fn recent_places(&self) -> Vec<SearchPlace> {
        self.recent.load().await
    }

    pub fn open_place_list(&self) -> Route {
        Route::PlaceList
    }

    async fn fetch_activity(&self) -> Result<Vec<ActivityPlace>, ApiError> {
        let activity = self
            .client
            .my_activity(self.lookback_days)
            .await
            .into_result()?;
        let places = activity.into_combined();
        tracing::debug!(count = places.len(), "Loaded activity places");
        Ok(places)
    }
}
