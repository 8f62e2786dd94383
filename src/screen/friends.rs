// Friend list, requests, add-friend and appointment screens

use std::time::Duration;

use thiserror::Error;

use crate::api::ApiClient;
use crate::api::models::{Friend, FriendRequest, FriendsQuery, Relation, UserLookup};
use crate::error::{ApiError, ErrorKind};
use crate::screen::{Debouncer, Route, ScreenController, ScreenState, Selection};
use crate::utils::status_codes;

/// Friends fetched per sheet load; the sheet does not paginate.
pub const FRIENDS_PAGE_SIZE: u32 = 50;

fn first_page(search: Option<&str>) -> FriendsQuery {
    FriendsQuery {
        search: search
            .map(str::trim)
            .filter(|search| !search.is_empty())
            .map(str::to_string),
        page: Some(0),
        size: Some(FRIENDS_PAGE_SIZE),
    }
}

/// Friend list in the map's bottom sheet.
pub struct FriendsSheet {
    client: ApiClient,
    friends: ScreenController<Vec<Friend>>,
    debouncer: Debouncer,
    selected: Selection,
    favourites: Selection,
}

impl FriendsSheet {
    pub fn new(client: ApiClient, search_debounce: Duration) -> Self {
        Self {
            client,
            friends: ScreenController::new(),
            debouncer: Debouncer::new(search_debounce),
            selected: Selection::default(),
            favourites: Selection::default(),
        }
    }

    pub fn state(&self) -> ScreenState<Vec<Friend>> {
        self.friends.state()
    }

    pub fn controller(&self) -> &ScreenController<Vec<Friend>> {
        &self.friends
    }

    pub fn friends(&self) -> Vec<Friend> {
        self.friends.data().unwrap_or_default()
    }

    /// Expands the sheet. Fetches only before the first load or after a
    /// failed one; an empty list that loaded fine is not refetched.
    pub async fn open(&self) {
        if matches!(self.friends.state(), ScreenState::Idle | ScreenState::Failed(_)) {
            self.fetch(None).await;
        }
    }

    pub async fn fetch(&self, search: Option<&str>) -> Option<Result<Vec<Friend>, ApiError>> {
        let query = first_page(search);
        self.friends
            .load(async {
                self.client
                    .friends(&query)
                    .await
                    .into_result()
                    .map(|page| page.content)
            })
            .await
    }

    /// Search-as-you-type. Returns `None` when a later keystroke took over,
    /// either during the debounce or while the request was in flight.
    pub async fn search_changed(&self, text: &str) -> Option<Result<Vec<Friend>, ApiError>> {
        if !self.debouncer.settle().await {
            return None;
        }
        self.fetch(Some(text)).await
    }

    pub fn toggle_selected(&mut self, user_id: i64) -> bool {
        self.selected.toggle(user_id)
    }

    pub fn toggle_favourite(&mut self, user_id: i64) -> bool {
        self.favourites.toggle(user_id)
    }

    pub fn selected(&self) -> &Selection {
        &self.selected
    }

    pub fn favourites(&self) -> &Selection {
        &self.favourites
    }
}

/// Incoming friend requests.
pub struct FriendRequestsScreen {
    client: ApiClient,
    requests: ScreenController<Vec<FriendRequest>>,
}

impl FriendRequestsScreen {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            requests: ScreenController::new(),
        }
    }

    pub fn state(&self) -> ScreenState<Vec<FriendRequest>> {
        self.requests.state()
    }

    pub fn requests(&self) -> Vec<FriendRequest> {
        self.requests.data().unwrap_or_default()
    }

    /// Reloads every time the screen gains focus.
    pub async fn focus(&self) -> Option<Result<Vec<FriendRequest>, ApiError>> {
        self.requests
            .load(async { self.client.friend_requests().await.into_result() })
            .await
    }

    pub async fn accept(&self, friend_user_id: i64) -> Result<(), ApiError> {
        self.respond(friend_user_id, true).await
    }

    pub async fn reject(&self, friend_user_id: i64) -> Result<(), ApiError> {
        self.respond(friend_user_id, false).await
    }

    /// On success the request is dropped from the local list without a
    /// refetch. On failure the list is left alone.
    async fn respond(&self, friend_user_id: i64, accept: bool) -> Result<(), ApiError> {
        let response = self
            .client
            .respond_to_friend_request(friend_user_id, accept)
            .await;

        if response.code != status_codes::OK {
            let fallback = if accept {
                "Failed to accept the friend request"
            } else {
                "Failed to reject the friend request"
            };
            let err = ApiError::new(response.code, response.message);
            return Err(ApiError::new(err.code, err.user_message(fallback)));
        }

        self.requests
            .update(|requests| requests.retain(|request| request.user_id != friend_user_id));
        tracing::info!(friend_user_id, accept, "Responded to friend request");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddFriendError {
    #[error("Please enter a friend ID")]
    EmptyInput,
    #[error("Please enter a valid friend ID")]
    InvalidId,
    #[error("User not found")]
    NotFound,
    #[error("You cannot add yourself as a friend")]
    SelfLookup,
    #[error("Already friends")]
    AlreadyFriends,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result of sending a friend request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FriendRequestOutcome {
    Sent,
    /// Already friends, or a request is already pending
    Duplicate(String),
    NotFound(String),
    Failed(ApiError),
}

/// Looks a user up by numeric id and sends them a friend request.
pub struct AddFriendScreen {
    client: ApiClient,
    lookup: ScreenController<UserLookup, AddFriendError>,
    sending: ScreenController<()>,
}

impl AddFriendScreen {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            lookup: ScreenController::new(),
            sending: ScreenController::new(),
        }
    }

    pub fn state(&self) -> ScreenState<UserLookup, AddFriendError> {
        self.lookup.state()
    }

    pub fn is_sending(&self) -> bool {
        self.sending.is_loading()
    }

    /// The user found by the last successful lookup.
    pub fn candidate(&self) -> Option<UserLookup> {
        match self.lookup.state() {
            ScreenState::Ready(user) => Some(user),
            _ => None,
        }
    }

    pub async fn lookup(&self, input: &str) -> Option<Result<UserLookup, AddFriendError>> {
        let user_id = match parse_user_id(input) {
            Ok(user_id) => user_id,
            Err(err) => {
                self.lookup.fail(err.clone());
                return Some(Err(err));
            }
        };

        self.lookup
            .load(async {
                let response = self.client.lookup_user(user_id).await;
                if response.code == status_codes::NOT_FOUND {
                    return Err(AddFriendError::NotFound);
                }
                response
                    .into_result()
                    .map_err(AddFriendError::from)
                    .and_then(addable)
            })
            .await
    }

    /// Sends a request to the current candidate. `None` when there is no
    /// candidate or a newer send superseded this one.
    pub async fn send_request(&self) -> Option<FriendRequestOutcome> {
        let candidate = self.candidate()?;
        let outcome = self
            .sending
            .load(async {
                let response = self.client.add_friend(candidate.user_id).await;
                if response.code == status_codes::OK {
                    Ok(())
                } else {
                    Err(ApiError::new(response.code, response.message))
                }
            })
            .await?;

        let outcome = match outcome {
            Ok(()) => FriendRequestOutcome::Sent,
            Err(err) => match err.kind() {
                ErrorKind::Conflict => FriendRequestOutcome::Duplicate(
                    err.message_or("Already friends or request already sent").to_string(),
                ),
                ErrorKind::NotFound => {
                    FriendRequestOutcome::NotFound(err.message_or("User not found").to_string())
                }
                _ => FriendRequestOutcome::Failed(err),
            },
        };
        tracing::info!(friend_user_id = candidate.user_id, ?outcome, "Friend request sent");
        Some(outcome)
    }

    /// Where the "received requests" shortcut leads.
    pub fn open_requests(&self) -> Route {
        Route::FriendRequests
    }
}

fn addable(user: UserLookup) -> Result<UserLookup, AddFriendError> {
    if user.me {
        Err(AddFriendError::SelfLookup)
    } else if user.relation == Relation::Friend {
        Err(AddFriendError::AlreadyFriends)
    } else {
        Ok(user)
    }
}

fn parse_user_id(input: &str) -> Result<i64, AddFriendError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AddFriendError::EmptyInput);
    }
    input.parse().map_err(|_| AddFriendError::InvalidId)
}

/// Picks accepted friends to meet with before searching for a place.
pub struct AppointmentScreen {
    client: ApiClient,
    friends: ScreenController<Vec<Friend>>,
    selected: Selection,
}

impl AppointmentScreen {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            friends: ScreenController::new(),
            selected: Selection::default(),
        }
    }

    pub fn state(&self) -> ScreenState<Vec<Friend>> {
        self.friends.state()
    }

    pub fn friends(&self) -> Vec<Friend> {
        self.friends.data().unwrap_or_default()
    }

    /// Loads the first page and keeps only accepted friends.
    pub async fn load(&self) -> Option<Result<Vec<Friend>, ApiError>> {
        let query = first_page(None);
        self.friends
            .load(async {
                self.client.friends(&query).await.into_result().map(|page| {
                    page.content
                        .into_iter()
                        .filter(Friend::is_accepted)
                        .collect::<Vec<_>>()
                })
            })
            .await
    }

    pub fn toggle(&mut self, user_id: i64) -> bool {
        self.selected.toggle(user_id)
    }

    pub fn selected(&self) -> &Selection {
        &self.selected
    }

    /// Moves on to the place search with the chosen friends.
    pub fn complete(&self) -> Route {
        Route::Search {
            friend_ids: self.selected.ids(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", AddFriendError::EmptyInput)]
    #[case("   ", AddFriendError::EmptyInput)]
    #[case("abc", AddFriendError::InvalidId)]
    #[case("12x", AddFriendError::InvalidId)]
    fn rejects_bad_ids(#[case] input: &str, #[case] expected: AddFriendError) {
        assert_eq!(parse_user_id(input), Err(expected));
    }

    #[test]
    fn parses_trimmed_ids() {
        assert_eq!(parse_user_id(" 42 "), Ok(42));
    }

    #[test]
    fn blank_search_is_omitted() {
        assert_eq!(first_page(Some("  ")).search, None);
        assert_eq!(first_page(Some(" kim ")).search.as_deref(), Some("kim"));
        assert_eq!(first_page(None).size, Some(FRIENDS_PAGE_SIZE));
    }
}
