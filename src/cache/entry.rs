//! Cache Entry Module
//!
//! Defines the structure for individual cached artifacts.

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// A computed artifact together with its bookkeeping.
#[derive(Debug, Clone)]
pub struct CacheEntry<A> {
    /// The computed artifact
    pub artifact: A,
    /// Insertion order within the owning store
    pub sequence: u64,
    /// When the artifact was inserted
    pub created_at: DateTime<Utc>,
    /// When the artifact was last returned to a caller
    pub last_accessed: DateTime<Utc>,
    /// Number of times the artifact was returned from the cache
    pub access_count: u64,
}

impl<A> CacheEntry<A> {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    ///
    /// # Arguments
    /// * `artifact` - The computed artifact
    /// * `sequence` - Insertion sequence number assigned by the store
    pub fn new(artifact: A, sequence: u64) -> Self {
        let now = Utc::now();
        Self {
            artifact,
            sequence,
            created_at: now,
            last_accessed: now,
            access_count: 0,
        }
    }

    // == Record Access ==
    /// Stamps the entry as accessed now.
    pub fn record_access(&mut self) {
        self.last_accessed = Utc::now();
        self.access_count += 1;
    }

    /// Returns how long ago the artifact was inserted, in milliseconds.
    pub fn age_ms(&self) -> i64 {
        (Utc::now() - self.created_at).num_milliseconds().max(0)
    }
}
