//! Storage keys shared by every screen

/// Raw bearer token of the signed-in user
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Refresh token issued alongside the access token
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// JSON array of the most recently searched places, newest first
pub const RECENT_SEARCH_PLACES_KEY: &str = "recent_search_places";
