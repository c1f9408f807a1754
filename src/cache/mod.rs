//! Cache Module
//!
//! Provides bounded in-memory artifact caching with LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default maximum number of cached artifacts
pub const DEFAULT_CAPACITY: usize = 500;
