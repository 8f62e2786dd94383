//! Operations over persisted client state

pub mod recent_search;
pub mod token;

pub use recent_search::{merge_recent, RecentSearchCache, DEFAULT_RECENT_CAPACITY};
pub use token::TokenCacheOperations;
