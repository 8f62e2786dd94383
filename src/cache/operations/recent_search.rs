use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::models::SearchPlace;
use crate::cache::keys::RECENT_SEARCH_PLACES_KEY;
use crate::error::StoreError;
use crate::store::KeyValueStore;

pub const DEFAULT_RECENT_CAPACITY: usize = 10;

/// Last N distinct searched places, newest first, persisted as one JSON blob.
///
/// Clones share one write lock, so read-modify-write cycles issued through
/// any clone are serialised. Readers always go back to storage.
#[derive(Clone)]
pub struct RecentSearchCache {
    store: Arc<dyn KeyValueStore>,
    capacity: usize,
    write_lock: Arc<Mutex<()>>,
}

impl RecentSearchCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_capacity(store, DEFAULT_RECENT_CAPACITY)
    }

    pub fn with_capacity(store: Arc<dyn KeyValueStore>, capacity: usize) -> Self {
        Self {
            store,
            capacity,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stored places; unreadable or corrupt data reads as empty.
    pub async fn load(&self) -> Vec<SearchPlace> {
        match self.store.get(RECENT_SEARCH_PLACES_KEY).await {
            Ok(Some(json)) => decode_places(&json),
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!("Failed to read recent search places: {}", err);
                Vec::new()
            }
        }
    }

    /// Merges a batch of results into the stored list and returns the list
    /// as written. An empty batch leaves storage untouched. A failed read
    /// aborts without writing; corrupt data is replaced.
    pub async fn record(&self, batch: &[SearchPlace]) -> Result<Vec<SearchPlace>, StoreError> {
        if batch.is_empty() {
            return Ok(self.load().await);
        }

        let _guard = self.write_lock.lock().await;
        let existing = match self.store.get(RECENT_SEARCH_PLACES_KEY).await? {
            Some(json) => decode_places(&json),
            None => Vec::new(),
        };
        let merged = merge_recent(existing, batch, self.capacity);
        let json = serde_json::to_string(&merged)?;
        self.store.set(RECENT_SEARCH_PLACES_KEY, &json).await?;

        tracing::debug!("Stored {} recent search places", merged.len());
        Ok(merged)
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.store.remove(RECENT_SEARCH_PLACES_KEY).await
    }
}

fn decode_places(json: &str) -> Vec<SearchPlace> {
    serde_json::from_str(json).unwrap_or_else(|err| {
        tracing::warn!("Discarding unreadable recent search places: {}", err);
        Vec::new()
    })
}

/// Prepends each batch entry whose id is not already present, in batch order,
/// then truncates to `capacity`. Entries already present keep their slot.
pub fn merge_recent(
    existing: Vec<SearchPlace>,
    batch: &[SearchPlace],
    capacity: usize,
) -> Vec<SearchPlace> {
    let mut merged = existing;
    for place in batch {
        if merged.iter().any(|p| p.id == place.id) {
            continue;
        }
        merged.insert(0, place.clone());
    }
    merged.truncate(capacity);
    merged
}
