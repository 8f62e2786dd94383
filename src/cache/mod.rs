// Locally persisted state: session tokens and recent searches

pub mod keys;
pub mod operations;

pub use operations::{RecentSearchCache, TokenCacheOperations};
