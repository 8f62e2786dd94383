// Place endpoints

use reqwest::Method;

use crate::api::client::ApiClient;
use crate::api::models::*;
use crate::config::endpoints;
use crate::utils::status_codes;

impl ApiClient {
    /// GET /places/nearby, only set parameters are sent
    pub async fn nearby_places(&self, query: &NearbyPlacesQuery) -> ApiResponse<Page<Place>> {
        self.request(Method::GET, endpoints::PLACES_NEARBY, |builder| {
            builder.query(query)
        })
        .await
    }

    /// GET /places, every place the user saved
    pub async fn user_places(&self) -> ApiResponse<Vec<Place>> {
        self.request(Method::GET, endpoints::PLACES, |builder| builder)
            .await
    }

    /// GET /places/{placeId}
    pub async fn place_detail(&self, place_id: i64, include_insight: bool) -> ApiResponse<PlaceDetail> {
        let path = endpoints::place_detail(place_id);
        self.request(Method::GET, &path, |builder| {
            if include_insight {
                builder.query(&DetailQuery {
                    include_insight: true,
                })
            } else {
                builder
            }
        })
        .await
    }

    /// POST /places
    pub async fn create_place(&self, place: &CreatePlaceRequest) -> ApiResponse<Place> {
        self.request(Method::POST, endpoints::PLACES, |builder| builder.json(place))
            .await
    }

    /// PATCH /places/{placeId}, memo and/or tags
    pub async fn update_place(&self, place_id: i64, update: &UpdatePlaceRequest) -> ApiResponse<Place> {
        let path = endpoints::place_detail(place_id);
        self.request(Method::PATCH, &path, |builder| builder.json(update))
            .await
    }

    /// GET /places/search
    ///
    /// A query with no text and no mood/review/color is rejected locally.
    pub async fn search_places(&self, query: &PlaceSearchQuery) -> ApiResponse<Vec<SearchPlace>> {
        if query.is_empty() {
            return ApiResponse::failure(status_codes::BAD_REQUEST, "Search query is empty");
        }
        let query = query.normalized();
        self.request(Method::GET, endpoints::PLACES_SEARCH, |builder| {
            builder.query(&query)
        })
        .await
    }
}
