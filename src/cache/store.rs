//! Cache Store Module
//!
//! Bounded artifact storage combining a HashMap with LRU tracking.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::error::{MapError, Result};
use crate::space::Key;

// == Cache Store ==
/// Artifact storage with strict LRU eviction.
#[derive(Debug, Clone)]
pub struct CacheStore<A> {
    /// Key-artifact storage
    entries: HashMap<Key, CacheEntry<A>>,
    /// LRU access tracker
    lru: LruTracker<Key>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Sequence number handed to the next inserted entry
    next_sequence: u64,
}

impl<A> CacheStore<A> {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `max_entries` artifacts.
    ///
    /// Fails if `max_entries` is zero.
    pub fn new(max_entries: usize) -> Result<Self> {
        if max_entries == 0 {
            return Err(MapError::InvalidConfig(
                "cache capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
            next_sequence: 0,
        })
    }

    // == Get Or Insert ==
    /// Returns the cached artifact for `key`, computing it with `resolve` on a miss.
    ///
    /// A hit marks the key most recently used. On a miss the artifact is
    /// computed first; eviction only happens once it is available, so a
    /// failing `resolve` leaves the store untouched apart from the miss count.
    pub fn get_or_try_insert_with<F>(&mut self, key: &Key, resolve: F) -> Result<&A>
    where
        F: FnOnce() -> Result<A>,
    {
        if self.entries.contains_key(key) {
            self.stats.record_hit();
            self.lru.touch(key);
            debug!("Cache hit for {}", key);
        } else {
            self.stats.record_miss();
            debug!("Cache miss for {}", key);
            let artifact = resolve()?;
            self.stats.record_computation();
            self.insert(key.clone(), artifact);
        }

        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.record_access();
                Ok(&entry.artifact)
            }
            None => Err(MapError::Internal(format!(
                "entry for {} missing after insertion",
                key
            ))),
        }
    }

    // == Insert ==
    /// Stores an artifact under `key`, marking it most recently used.
    ///
    /// If the key already exists its artifact is replaced in place.
    /// Otherwise, if the store is at capacity, the least recently used entry
    /// is evicted first.
    pub fn insert(&mut self, key: Key, artifact: A) {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.artifact = artifact;
            self.lru.touch(&key);
            return;
        }

        while self.lru.len() >= self.max_entries {
            match self.lru.evict_oldest() {
                Some(evicted) => {
                    if let Some(entry) = self.entries.remove(&evicted) {
                        debug!(
                            "Evicted least recently used key {} (age {}ms, {} accesses, last at {})",
                            evicted,
                            entry.age_ms(),
                            entry.access_count,
                            entry.last_accessed.to_rfc3339()
                        );
                    }
                    self.stats.record_eviction();
                }
                None => break,
            }
        }

        let entry = CacheEntry::new(artifact, self.next_sequence);
        self.next_sequence += 1;
        self.lru.insert_new(key.clone());
        self.entries.insert(key, entry);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Peek ==
    /// Returns the cached artifact without touching recency or statistics.
    pub fn peek(&self, key: &Key) -> Option<&A> {
        self.entries.get(key).map(|entry| &entry.artifact)
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    // == Keys ==
    /// Returns the cached keys in insertion order.
    pub fn keys(&self) -> Vec<Key> {
        self.entries_in_order()
            .into_iter()
            .map(|(key, _)| key.clone())
            .collect()
    }

    // == Entries ==
    /// Returns every cached key and artifact in insertion order.
    pub fn entries_in_order(&self) -> Vec<(&Key, &A)> {
        let mut ordered: Vec<(&Key, &CacheEntry<A>)> = self.entries.iter().collect();
        ordered.sort_by_key(|(_, entry)| entry.sequence);
        ordered
            .into_iter()
            .map(|(key, entry)| (key, &entry.artifact))
            .collect()
    }

    /// Returns the least recently used key, the next eviction candidate.
    pub fn oldest(&self) -> Option<&Key> {
        self.lru.peek_oldest()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Counts an artifact produced outside `get_or_try_insert_with`.
    pub fn record_computation(&mut self) {
        self.stats.record_computation();
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
