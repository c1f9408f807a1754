//! Cache Statistics Module
//!
//! Counters describing how a map's lookups were answered.

use serde::Serialize;

// == Cache Stats ==
/// Lookup and eviction counters for one cache store.
///
/// A derived map starts from zero: populating it by selection counts
/// computations but neither hits nor misses.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to run the generator (successfully or not)
    pub misses: u64,
    /// Artifacts the generator produced for this store
    pub computations: u64,
    /// Entries dropped to stay within capacity
    pub evictions: u64,
    /// Entries currently held
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total lookups seen, hit or miss.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    // == Hit Rate ==
    /// Share of lookups answered from the cache, 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_computation(&mut self) {
        self.computations += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
