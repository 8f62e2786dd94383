//! Turns a list of place ids into full place details.
//!
//! At most `concurrency` detail requests are in flight at once. Results keep
//! the order of the requested ids. Failed fetches and details with unusable
//! coordinates are dropped, so the caller receives only valid entries and
//! never an error.

use std::future::Future;
use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream;
use tokio::sync::watch;

use crate::api::ApiClient;
use crate::api::models::{ApiResponse, PlaceDetail};
use crate::config::Config;
use crate::utils::has_valid_coordinates;

pub const DEFAULT_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HydrateOptions {
    pub concurrency: usize,
    pub include_insight: bool,
}

impl Default for HydrateOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            include_insight: true,
        }
    }
}

impl HydrateOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            concurrency: config.hydration_concurrency,
            ..Self::default()
        }
    }
}

/// Shared cancellation flag, owned by the screen that started the work.
///
/// Clones observe the same flag. Once set it stays set.
#[derive(Debug, Clone)]
pub struct Cancellation {
    flag: Arc<watch::Sender<bool>>,
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}

impl Cancellation {
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            flag: Arc::new(flag),
        }
    }

    pub fn cancel(&self) {
        self.flag.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.flag.borrow()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        let mut receiver = self.flag.subscribe();
        // the sender lives in `self`, so the channel cannot close here
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}

/// Fetches details for `ids` through `client`.
pub async fn hydrate_place_details(
    client: &ApiClient,
    ids: &[i64],
    options: &HydrateOptions,
    cancel: Option<&Cancellation>,
) -> Vec<PlaceDetail> {
    let include_insight = options.include_insight;
    hydrate_with(ids, options, cancel, |id| {
        client.place_detail(id, include_insight)
    })
    .await
}

/// Same as [`hydrate_place_details`] with the fetch supplied by the caller.
pub async fn hydrate_with<F, Fut>(
    ids: &[i64],
    options: &HydrateOptions,
    cancel: Option<&Cancellation>,
    fetch: F,
) -> Vec<PlaceDetail>
where
    F: Fn(i64) -> Fut,
    Fut: Future<Output = ApiResponse<PlaceDetail>>,
{
    let concurrency = options.concurrency.max(1);
    let mut responses = stream::iter(ids.iter().copied())
        .map(|id| {
            let pending = fetch(id);
            async move { (id, pending.await) }
        })
        .buffered(concurrency);

    let mut details = Vec::with_capacity(ids.len());
    loop {
        let next = match cancel {
            Some(cancel) => tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(
                        completed = details.len(),
                        requested = ids.len(),
                        "Place detail hydration cancelled"
                    );
                    break;
                }
                next = responses.next() => next,
            },
            None => responses.next().await,
        };

        let Some((id, response)) = next else {
            break;
        };
        if let Some(detail) = accept(id, response) {
            details.push(detail);
        }
    }

    tracing::debug!(
        requested = ids.len(),
        hydrated = details.len(),
        "Place detail hydration finished"
    );
    details
}

fn accept(id: i64, response: ApiResponse<PlaceDetail>) -> Option<PlaceDetail> {
    let mut detail = match response.into_result() {
        Ok(detail) => detail,
        Err(err) => {
            tracing::warn!(place_id = id, code = err.code, "Dropping place detail: {}", err.message);
            return None;
        }
    };

    if !has_valid_coordinates(detail.place.lat, detail.place.lng) {
        tracing::warn!(
            place_id = id,
            lat = detail.place.lat,
            lng = detail.place.lng,
            "Dropping place detail with invalid coordinates"
        );
        return None;
    }

    detail.place.place_id.get_or_insert(id);
    Some(detail)
}
