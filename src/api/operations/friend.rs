// Friend graph endpoints

use reqwest::Method;

use crate::api::client::ApiClient;
use crate::api::models::*;
use crate::config::endpoints;

impl ApiClient {
    /// GET /friends
    pub async fn friends(&self, query: &FriendsQuery) -> ApiResponse<FriendsPage> {
        self.request(Method::GET, endpoints::FRIENDS, |builder| builder.query(query))
            .await
    }

    /// POST /friends/add
    pub async fn add_friend(&self, friend_user_id: i64) -> ApiResponse<StatusResponse> {
        let body = AddFriendRequest { friend_user_id };
        self.request(Method::POST, endpoints::FRIENDS_ADD, |builder| {
            builder.json(&body)
        })
        .await
    }

    /// GET /friends/requests, incoming requests still pending
    pub async fn friend_requests(&self) -> ApiResponse<Vec<FriendRequest>> {
        self.request(Method::GET, endpoints::FRIENDS_REQUESTS, |builder| builder)
            .await
    }

    /// POST /friends/respond?friendUserId=&accept=, no body
    pub async fn respond_to_friend_request(
        &self,
        friend_user_id: i64,
        accept: bool,
    ) -> ApiResponse<StatusResponse> {
        let query = RespondQuery {
            friend_user_id,
            accept,
        };
        self.request(Method::POST, endpoints::FRIENDS_RESPOND, |builder| {
            builder.query(&query)
        })
        .await
    }
}
