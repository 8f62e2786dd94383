use crate::api::ApiClient;
use crate::api::models::{PlaceSearchQuery, SearchPlace};
use crate::cache::RecentSearchCache;
use crate::error::ApiError;
use crate::screen::{Route, ScreenController, ScreenState};

/// Hashtags looked for in a place's mood, review and color text.
const HASHTAG_KEYWORDS: [&str; 10] = [
    "따뜻한",
    "디저트",
    "크림톤",
    "조용한",
    "차가 맛있는",
    "사진 찍기 좋은",
    "친절",
    "커피",
    "인테리어",
    "대화하기",
];
const DEFAULT_HASHTAGS: [&str; 3] = ["따뜻한", "디저트", "조용한"];
const MAX_HASHTAGS: usize = 4;

const CATEGORY_EMOJIS: [&str; 3] = ["🍰", "🖼", "🌻"];

/// Natural-language place search.
pub struct SearchScreen {
    client: ApiClient,
    results: ScreenController<Vec<SearchPlace>>,
}

impl SearchScreen {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            results: ScreenController::new(),
        }
    }

    pub fn state(&self) -> ScreenState<Vec<SearchPlace>> {
        self.results.state()
    }

    pub async fn submit_text(&self, text: &str) -> Option<Result<Route, ApiError>> {
        self.submit(PlaceSearchQuery::text(text)).await
    }

    /// Runs the search and routes to the result screen.
    ///
    /// `None` for a blank query (nothing is sent) or when a later submit
    /// superseded this one.
    pub async fn submit(&self, query: PlaceSearchQuery) -> Option<Result<Route, ApiError>> {
        let query = query.normalized();
        if query.is_empty() {
            return None;
        }

        let outcome = self
            .results
            .load(async { self.client.search_places(&query).await.into_result() })
            .await?;

        Some(outcome.map(|places| Route::SearchResult { places, query }))
    }
}

/// One highlighted result on the result screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCategory {
    pub title: String,
    pub emoji: &'static str,
    pub place: SearchPlace,
}

/// Shows a finished search and remembers its places.
pub struct SearchResultScreen {
    recent: RecentSearchCache,
    places: Vec<SearchPlace>,
    query: PlaceSearchQuery,
}

impl SearchResultScreen {
    pub fn new(recent: RecentSearchCache, places: Vec<SearchPlace>, query: PlaceSearchQuery) -> Self {
        Self {
            recent,
            places,
            query,
        }
    }

    /// Built from a [`Route::SearchResult`]; `None` for any other route.
    pub fn from_route(recent: RecentSearchCache, route: Route) -> Option<Self> {
        match route {
            Route::SearchResult { places, query } => Some(Self::new(recent, places, query)),
            _ => None,
        }
    }

    pub fn places(&self) -> &[SearchPlace] {
        &self.places
    }

    /// Adds the results to the recent-search list and returns the list as
    /// stored. No-op when there are none. A storage failure is logged and
    /// reads as an empty list.
    pub async fn persist(&self) -> Vec<SearchPlace> {
        match self.recent.record(&self.places).await {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!("Failed to store recent search places: {}", err);
                Vec::new()
            }
        }
    }

    /// The first three results are labelled by the criteria the query used
    /// (mood, then color, then review). A query with none of them, or too
    /// few results, gets every result under a numbered label instead.
    pub fn categories(&self) -> Vec<SearchCategory> {
        let query = self.query.normalized();
        let criteria = [
            (query.mood.is_some(), "Warm lighting and great desserts"),
            (query.color.is_some(), "Warm colors and wood tones"),
            (query.review.is_some(), "Warm brown tones and good coffee"),
        ];

        let mut categories: Vec<SearchCategory> = criteria
            .iter()
            .enumerate()
            .filter(|(_, (used, _))| *used)
            .filter_map(|(index, (_, title))| {
                self.places.get(index).map(|place| SearchCategory {
                    title: title.to_string(),
                    emoji: CATEGORY_EMOJIS[index],
                    place: place.clone(),
                })
            })
            .collect();

        if categories.is_empty() {
            categories = self
                .places
                .iter()
                .enumerate()
                .map(|(index, place)| SearchCategory {
                    title: format!("Recommendation {}", index + 1),
                    emoji: CATEGORY_EMOJIS[index % CATEGORY_EMOJIS.len()],
                    place: place.clone(),
                })
                .collect();
        }
        categories
    }
}

/// Known keywords found in the place's descriptive text, at most four.
pub fn hashtags(place: &SearchPlace) -> Vec<&'static str> {
    let text = [&place.mood, &place.review, &place.color]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    let found: Vec<&'static str> = HASHTAG_KEYWORDS
        .into_iter()
        .filter(|keyword| text.contains(keyword))
        .take(MAX_HASHTAGS)
        .collect();

    if found.is_empty() {
        DEFAULT_HASHTAGS.to_vec()
    } else {
        found
    }
}
