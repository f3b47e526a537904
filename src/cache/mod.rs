//! Cache Module
//!
//! Read-through response cache for the item API. Handlers only see the
//! [`ResponseCache`] capability; [`MemoryCache`] is the in-process backend
//! with TTL expiration and LRU eviction.

mod entry;
mod lru;
mod memory;
mod stats;
mod store;


use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use memory::MemoryCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

// == Cache Error ==
/// Cache backend failure. Never surfaced to clients.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("key of {0} bytes exceeds the 256 byte limit")]
    KeyTooLong(usize),

    #[error("value of {0} bytes exceeds the 1 MiB limit")]
    ValueTooLarge(usize),

    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

// == Response Cache ==
/// Key/value cache with per-entry TTL.
///
/// A miss (`Ok(None)`) covers both "never set" and "expired".
#[async_trait]
pub trait ResponseCache: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Counters for the health report, if the backend keeps any.
    async fn stats(&self) -> Option<CacheStats> {
        None
    }
}

/// Cache key for a single item.
pub fn item_key(id: &impl std::fmt::Display) -> String {
    format!("items:id:{}", id)
}
