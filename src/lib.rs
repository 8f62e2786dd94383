use std::sync::Arc;

use api::ApiClient;
use auth::AuthContext;
use cache::RecentSearchCache;
use config::Config;
use error::BootstrapError;
use hydrate::HydrateOptions;
use screen::{
    AddFriendScreen, AppointmentScreen, FriendRequestsScreen, FriendsSheet, LoginScreen,
    MyPageScreen, PlaceListScreen, SearchResultScreen, SearchScreen,
};
use store::KeyValueStore;

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod hydrate;
pub mod screen;
pub mod store;
pub mod utils;

/// Everything the screens share: configuration, the API client and the
/// recent-search cache, all backed by one key-value store.
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub store: Arc<dyn KeyValueStore>,
    pub client: ApiClient,
    pub recent: RecentSearchCache,
}

impl AppContext {
    /// Opens the configured store and restores any saved session.
    pub async fn bootstrap(config: Config) -> Result<Self, BootstrapError> {
        let store = store::open(&config)?;
        Self::with_store(config, store).await
    }

    pub async fn with_store(
        config: Config,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, BootstrapError> {
        let auth = Arc::new(AuthContext::restore(store.clone()).await);
        let client = ApiClient::new(&config, auth)?;
        let recent = RecentSearchCache::with_capacity(store.clone(), config.recent_search_capacity);
        Ok(Self {
            config,
            store,
            client,
            recent,
        })
    }

    pub fn login_screen(&self) -> LoginScreen {
        LoginScreen::new(self.client.clone())
    }

    pub fn friends_sheet(&self) -> FriendsSheet {
        FriendsSheet::new(self.client.clone(), self.config.search_debounce())
    }

    pub fn friend_requests_screen(&self) -> FriendRequestsScreen {
        FriendRequestsScreen::new(self.client.clone())
    }

    pub fn add_friend_screen(&self) -> AddFriendScreen {
        AddFriendScreen::new(self.client.clone())
    }

    pub fn appointment_screen(&self) -> AppointmentScreen {
        AppointmentScreen::new(self.client.clone())
    }

    pub fn my_page_screen(&self) -> MyPageScreen {
        MyPageScreen::new(
            self.client.clone(),
            self.recent.clone(),
            self.config.activity_lookback_days,
        )
    }

    pub fn place_list_screen(&self) -> PlaceListScreen {
        PlaceListScreen::new(
            self.client.clone(),
            self.config.activity_lookback_days,
            HydrateOptions::from_config(&self.config),
        )
    }

    pub fn search_screen(&self) -> SearchScreen {
        SearchScreen::new(self.client.clone())
    }

    pub fn search_result_screen(&self, route: screen::Route) -> Option<SearchResultScreen> {
        SearchResultScreen::from_route(self.recent.clone(), route)
    }
}
