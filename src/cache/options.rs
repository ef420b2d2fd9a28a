//! Cache Options Module
//!
//! Per-operation settings: TTL, eviction policy and evict-on-get.

use chrono::Duration;

use crate::cache::EvictionPolicy;

// == Cache Options ==
/// Settings applied to a single cache operation.
///
/// Defaults: no TTL, `LRU` eviction, evict-on-get at capacity enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    /// Time to live; `None` means the record never expires
    pub ttl: Option<Duration>,
    /// Policy used when a write needs to free a slot
    pub eviction_policy: EvictionPolicy,
    /// Whether a read on a full bucket evicts the oldest record
    pub evict_on_get: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            ttl: None,
            eviction_policy: EvictionPolicy::Lru,
            evict_on_get: true,
        }
    }
}

impl CacheOptions {
    /// Sets the TTL. Zero or negative durations disable expiry.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl).filter(|ttl| *ttl > Duration::zero());
        self
    }

    /// Sets the TTL in whole seconds. Values too large to represent never expire.
    pub fn with_ttl_seconds(self, seconds: i64) -> Self {
        match Duration::try_seconds(seconds) {
            Some(ttl) => self.with_ttl(ttl),
            None => Self { ttl: None, ..self },
        }
    }

    pub fn with_eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.eviction_policy = policy;
        self
    }

    pub fn with_evict_on_get(mut self, enabled: bool) -> Self {
        self.evict_on_get = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default() {
        let opts = CacheOptions::default();
        assert!(opts.ttl.is_none());
        assert_eq!(opts.eviction_policy, EvictionPolicy::Lru);
        assert!(opts.evict_on_get);
    }

    #[test]
    fn test_with_ttl_positive() {
        let opts = CacheOptions::default().with_ttl(Duration::seconds(30));
        assert_eq!(opts.ttl, Some(Duration::seconds(30)));
    }

    #[test]
    fn test_with_ttl_non_positive_disables_expiry() {
        assert!(CacheOptions::default().with_ttl(Duration::zero()).ttl.is_none());
        assert!(CacheOptions::default().with_ttl_seconds(-1).ttl.is_none());
        assert!(CacheOptions::default().with_ttl_seconds(i64::MAX).ttl.is_none());
    }

    #[test]
    fn test_builder_chain() {
        let opts = CacheOptions::default()
            .with_ttl_seconds(5)
            .with_eviction_policy(EvictionPolicy::Newest)
            .with_evict_on_get(false);

        assert_eq!(opts.ttl, Some(Duration::seconds(5)));
        assert_eq!(opts.eviction_policy, EvictionPolicy::Newest);
        assert!(!opts.evict_on_get);
    }
}
