//! Screen controllers.
//!
//! Each screen owns its local state and calls the API client; rendering is
//! left to whatever front end drives these types. Navigation is expressed as
//! [`Route`] values returned from actions.

use std::collections::BTreeSet;

use crate::api::models::{PlaceDetail, PlaceSearchQuery, SearchPlace};

mod controller;
mod debounce;
pub mod friends;
pub mod login;
pub mod my_page;
pub mod places;
pub mod search;

pub use controller::{ScreenController, ScreenState};
pub use debounce::Debouncer;
pub use friends::{
    AddFriendError, AddFriendScreen, AppointmentScreen, FriendRequestOutcome,
    FriendRequestsScreen, FriendsSheet,
};
pub use login::{LoginError, LoginScreen};
pub use my_page::MyPageScreen;
pub use places::PlaceListScreen;
pub use search::{SearchCategory, SearchResultScreen, SearchScreen};

/// Place handed to the map so it can focus on it.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedPlace {
    pub place_id: i64,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl SelectedPlace {
    /// `None` when the detail carries no id.
    pub fn from_detail(detail: &PlaceDetail) -> Option<Self> {
        Some(Self {
            place_id: detail.place.place_id?,
            name: detail.place.name.clone(),
            lat: detail.place.lat,
            lng: detail.place.lng,
        })
    }
}

/// Navigation destinations, with the parameters each one receives.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Login,
    Map { focus: Option<SelectedPlace> },
    /// Free-text search, optionally on behalf of a meetup with friends
    Search { friend_ids: Vec<i64> },
    SearchResult {
        places: Vec<SearchPlace>,
        query: PlaceSearchQuery,
    },
    MyPage,
    PlaceList,
    FriendRequests,
    AddFriend,
    MakeAppointment,
}

/// Set of toggled user ids (selected friends, favourites).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<i64>,
}

impl Selection {
    /// Flips `id` and returns whether it is now selected.
    pub fn toggle(&mut self, id: i64) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ascending order.
    pub fn ids(&self) -> Vec<i64> {
        self.ids.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_membership() {
        let mut selection = Selection::default();
        assert!(selection.toggle(3));
        assert!(selection.toggle(1));
        assert!(selection.contains(3));
        assert_eq!(selection.ids(), vec![1, 3]);

        assert!(!selection.toggle(3));
        assert!(!selection.contains(3));
        assert_eq!(selection.len(), 1);
    }
}
