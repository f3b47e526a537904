//! LRU Tracker Module
//!
//! Orders cache keys by last access so the cache can evict the stalest one
//! when it reaches capacity.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Access-order index over cache keys.
///
/// Every touch stamps the key with a fresh tick; the smallest tick is the
/// least recently used key.
#[derive(Debug, Default)]
pub struct LruTracker {
    ticks: HashMap<String, u64>,
    order: BTreeMap<u64, String>,
    next_tick: u64,
}

impl LruTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a key as most recently used, inserting it if unknown.
    pub fn touch(&mut self, key: &str) {
        let tick = self.next_tick;
        self.next_tick += 1;

        if let Some(old) = self.ticks.insert(key.to_string(), tick) {
            self.order.remove(&old);
        }
        self.order.insert(tick, key.to_string());
    }

    pub fn remove(&mut self, key: &str) {
        if let Some(tick) = self.ticks.remove(key) {
            self.order.remove(&tick);
        }
    }

    /// Removes and returns the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }

    #[cfg(test)]
    fn peek_oldest(&self) -> Option<&str> {
        self.order.first_key_value().map(|(_, key)| key.as_str())
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.ticks.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    #[cfg(test)]
    fn contains(&self, key: &str) -> bool {
        self.ticks.contains_key(key)
    }
}
