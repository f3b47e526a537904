//! Cache Store Module
//!
//! Bounded key/value map with per-entry TTL and LRU eviction. Not
//! synchronized; [`super::MemoryCache`] puts it behind a lock.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::cache::{CacheEntry, CacheError, CacheStats, LruTracker, MAX_KEY_LENGTH, MAX_VALUE_SIZE};

// == Cache Store ==
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    stats: CacheStats,
    max_entries: usize,
}

impl CacheStore {
    /// Creates an empty store holding at most `max_entries` (minimum one).
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::default(),
            max_entries: max_entries.max(1),
        }
    }

    /// Stores `value` under `key` for `ttl`, replacing any previous entry.
    ///
    /// At capacity, the least recently used entry is evicted first.
    pub fn set(&mut self, key: String, value: String, ttl: Duration) -> Result<(), CacheError> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::KeyTooLong(key.len()));
        }
        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::ValueTooLarge(value.len()));
        }

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                self.stats.evictions += 1;
            }
        }

        self.lru.touch(&key);
        self.entries.insert(key, CacheEntry::new(value, ttl));
        Ok(())
    }

    /// Returns the live value for `key`. Expired entries are dropped and
    /// reported as a miss.
    pub fn get(&mut self, key: &str) -> Option<String> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                let value = entry.value.clone();
                self.stats.hits += 1;
                self.lru.touch(key);
                Some(value)
            }
            Some(_) => {
                self.entries.remove(key);
                self.lru.remove(key);
                self.stats.misses += 1;
                None
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Removes `key`; returns whether an entry was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.lru.remove(key);
        self.entries.remove(key).is_some()
    }

    /// Drops every expired entry, returning how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        let lru = &mut self.lru;
        self.entries.retain(|key, entry| {
            let live = !entry.is_expired_at(now);
            if !live {
                lru.remove(key);
            }
            live
        });
        before - self.entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.entries.len(),
            ..self.stats
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
