//! Backend path templates, relative to the API base URL.

pub const LOGIN: &str = "/users/login";
pub const REFRESH_TOKEN: &str = "/users/refresh-token";
pub const USERS_ME: &str = "/users/me";
pub const USERS_LOOKUP: &str = "/users/lookup";

pub const PLACES: &str = "/places";
pub const PLACES_NEARBY: &str = "/places/nearby";
pub const PLACES_SEARCH: &str = "/places/search";

pub const FRIENDS: &str = "/friends";
pub const FRIENDS_ADD: &str = "/friends/add";
pub const FRIENDS_REQUESTS: &str = "/friends/requests";
pub const FRIENDS_RESPOND: &str = "/friends/respond";

pub const PROFILE_ACTIVITY: &str = "/profile/me/activity";

/// `/places/{placeId}`
pub fn place_detail(place_id: i64) -> String {
    format!("{}/{}", PLACES, place_id)
}
