//! Cache Entry Module
//!
//! A cached response payload and its expiry deadline.

use std::time::{Duration, Instant};

// == Cache Entry ==
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Serialized response payload
    pub value: String,
    /// Monotonic deadline; the entry is a miss from this instant on
    pub expires_at: Instant,
}

impl CacheEntry {
    pub fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    /// An entry is expired once `now` reaches its deadline.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Time left before expiry, zero once expired.
    #[cfg(test)]
    fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_fresh_entry_is_live() {
        let entry = CacheEntry::new("payload".to_string(), Duration::from_secs(60));
        assert_eq!(entry.value, "payload");
        assert!(!entry.is_expired());
        assert!(entry.ttl_remaining() > Duration::from_secs(59));
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let entry = CacheEntry::new("payload".to_string(), Duration::from_millis(30));
        sleep(Duration::from_millis(50));
        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining(), Duration::ZERO);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("payload".to_string(), Duration::from_secs(1));
        assert!(entry.is_expired_at(entry.expires_at));
        assert!(!entry.is_expired_at(entry.expires_at - Duration::from_millis(1)));
    }

    #[test]
    fn test_zero_ttl_is_immediately_expired() {
        let entry = CacheEntry::new("payload".to_string(), Duration::ZERO);
        assert!(entry.is_expired());
    }
}
