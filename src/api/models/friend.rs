use serde::{Deserialize, Serialize};

use crate::api::models::common::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FriendStatus {
    Accepted,
    Pending,
    Rejected,
    /// Any status this client does not know yet
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub user_id: i64,
    pub nickname: String,
    pub status: FriendStatus,
}

impl Friend {
    pub fn is_accepted(&self) -> bool {
        self.status == FriendStatus::Accepted
    }
}

pub type FriendsPage = Page<Friend>;

/// Incoming request; the backend only lists pending ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    pub user_id: i64,
    pub nickname: String,
    pub status: FriendStatus,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FriendsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFriendRequest {
    pub friend_user_id: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondQuery {
    pub friend_user_id: i64,
    pub accept: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_does_not_break_the_page() {
        let page: FriendsPage = serde_json::from_str(
            r#"{"content":[
                {"userId":1,"nickname":"a","status":"ACCEPTED"},
                {"userId":2,"nickname":"b","status":"BLOCKED"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(page.content[1].status, FriendStatus::Unknown);
        assert!(page.content[0].is_accepted());
        assert!(!page.content[1].is_accepted());
    }
}
