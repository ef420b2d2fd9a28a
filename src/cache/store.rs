//! Bucket Store Module
//!
//! A single capacity-bounded cache: key index over a record arena with
//! recency and insertion orderings, lazy TTL expiry and policy-driven eviction.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, warn};

use crate::cache::arena::{Handle, Order, RecordArena};
use crate::cache::{CacheStats, Clock, EvictionPolicy, Record, SystemClock};
use crate::error::Result;

// == Bucket Store ==
/// Capacity-bounded store for one bucket.
///
/// Not synchronized on its own; `CacheManager` wraps each store in a mutex.
#[derive(Debug)]
pub struct BucketStore {
    /// Key to arena handle
    index: HashMap<String, Handle>,
    /// Records plus both orderings
    arena: RecordArena,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of records
    capacity: usize,
    /// Time source for TTL
    clock: Arc<dyn Clock>,
}

impl BucketStore {
    // == Constructor ==
    /// Creates an empty store backed by the system clock.
    ///
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, Arc::new(SystemClock))
    }

    /// Creates an empty store reading time from `clock`.
    ///
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn with_clock(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        assert!(capacity > 0, "BucketStore capacity must be > 0");
        Self {
            index: HashMap::with_capacity(capacity),
            arena: RecordArena::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
            clock,
        }
    }

    // == Set ==
    /// Stores `value` under `key`.
    ///
    /// An existing key is refreshed in place: value and expiry are replaced,
    /// it becomes most recently used, and its insertion position is kept.
    /// A new key on a full store first frees one record via `policy`; with
    /// `Disabled` the write is rejected and nothing changes.
    ///
    /// # Arguments
    /// * `ttl` - Time to live; `None` or non-positive means no expiry
    pub fn set(
        &mut self,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
        policy: EvictionPolicy,
    ) -> Result<()> {
        let now = self.clock.now();

        if let Some(&handle) = self.index.get(key) {
            if let Some(record) = self.arena.get_mut(handle) {
                record.refresh(value, ttl, now);
            }
            self.arena.touch(handle);
            return Ok(());
        }

        if self.is_full() {
            match policy.select_victim(&self.arena) {
                Ok(Some(victim)) => self.evict(victim, policy),
                Ok(None) => {}
                Err(err) => {
                    warn!(key, capacity = self.capacity, "write rejected: {}", err);
                    return Err(err);
                }
            }
        }

        let handle = self.arena.insert(Record::new(key.to_string(), value, ttl, now));
        self.index.insert(key.to_string(), handle);
        debug_assert_eq!(self.arena.order_len(Order::Recency), self.index.len());
        debug_assert_eq!(self.arena.order_len(Order::Insertion), self.index.len());

        Ok(())
    }

    // == Get ==
    /// Looks up `key`, returning `None` when absent or expired.
    ///
    /// Expired records are removed on sight and counted as both a miss and
    /// an expiration. On a hit against a full store with `evict_on_get`, one
    /// `Oldest` eviction runs instead of the recency refresh; the value read
    /// before the eviction is still returned, even if its own record was the
    /// one evicted.
    pub fn get(&mut self, key: &str, evict_on_get: bool) -> Option<Vec<u8>> {
        let Some(&handle) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        let now = self.clock.now();
        let record = self.arena.get(handle)?;

        if record.is_expired_at(now) {
            debug!(key, "lazily expired");
            self.remove(handle);
            self.stats.record_miss();
            self.stats.record_expired();
            return None;
        }

        let value = record.value.clone();

        if evict_on_get && self.is_full() {
            if let Ok(Some(victim)) = EvictionPolicy::Oldest.select_victim(&self.arena) {
                self.evict(victim, EvictionPolicy::Oldest);
            }
        } else {
            self.arena.touch(handle);
        }

        self.stats.record_hit();
        Some(value)
    }

    // == Delete ==
    /// Removes `key` if present. Missing keys are a no-op.
    pub fn delete(&mut self, key: &str) {
        if let Some(&handle) = self.index.get(key) {
            self.remove(handle);
        }
    }

    // == Stats ==
    /// Returns a snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn is_full(&self) -> bool {
        self.index.len() >= self.capacity
    }

    fn evict(&mut self, victim: Handle, policy: EvictionPolicy) {
        if let Some(record) = self.remove(victim) {
            debug!(key = record.key(), %policy, "evicted");
            self.stats.record_eviction();
        }
    }

    /// Drops the record from the index and both orderings together.
    fn remove(&mut self, handle: Handle) -> Option<Record> {
        let record = self.arena.remove(handle)?;
        self.index.remove(record.key());
        Some(record)
    }

    /// Verifies that index and both orderings agree and respect capacity.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> std::result::Result<(), String> {
        let index_len = self.index.len();
        let recency = self.arena.iter(Order::Recency).count();
        let insertion = self.arena.iter(Order::Insertion).count();
        if index_len != recency || index_len != insertion || index_len != self.arena.len() {
            return Err(format!(
                "size mismatch: index={} recency={} insertion={} arena={}",
                index_len,
                recency,
                insertion,
                self.arena.len()
            ));
        }
        if index_len > self.capacity {
            return Err(format!("size {} exceeds capacity {}", index_len, self.capacity));
        }
        Ok(())
    }

    /// Keys in `order` from head to tail.
    #[cfg(test)]
    pub(crate) fn keys(&self, order: Order) -> Vec<String> {
        self.arena.iter(order).map(|r| r.key().to_string()).collect()
    }
}

impl Default for BucketStore {
    fn default() -> Self {
        Self::new(crate::cache::BUCKET_CAPACITY)
    }
}
