//! On-device key-value storage.
//!
//! Screens and the auth context only see [`KeyValueStore`]; which backend sits
//! behind it is decided once at startup by [`open`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::StoreError;

mod file;
mod memory;
mod redis_store;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// String-keyed, string-valued persistent storage.
///
/// Each call is independent; there is no transaction spanning several keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Redis when `REDIS_URL` is configured, otherwise a JSON file.
pub fn open(config: &Config) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    match &config.redis_url {
        Some(url) => {
            tracing::debug!("Using redis-backed storage");
            Ok(Arc::new(RedisStore::open(url)?))
        }
        None => {
            tracing::debug!("Using file storage at {}", config.storage_path.display());
            Ok(Arc::new(FileStore::new(config.storage_path.clone())))
        }
    }
}
