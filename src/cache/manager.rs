//! Cache Manager Module
//!
//! Routes operations to named buckets, creating a bucket on its first write.
//!
//! Locking: the bucket map sits behind a `RwLock` that is only taken for
//! writing while a new bucket is installed. Each bucket has its own `Mutex`.
//! At most one bucket lock is held at a time, and never together with the
//! map's write lock.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{info, warn};

use crate::cache::{BucketStore, CacheOptions, CacheStats, Clock, SystemClock, BUCKET_CAPACITY};
use crate::error::Result;

type SharedBucket = Arc<Mutex<BucketStore>>;

// == Cache Manager ==
/// Shared, bucketed cache. Share it across tasks through an `Arc`.
#[derive(Debug)]
pub struct CacheManager {
    buckets: RwLock<HashMap<String, SharedBucket>>,
    /// Capacity given to every new bucket
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheManager {
    /// Creates an empty manager whose buckets hold `BUCKET_CAPACITY` records.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty manager whose buckets read time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::with_capacity_and_clock(BUCKET_CAPACITY, clock)
    }

    pub(crate) fn with_capacity_and_clock(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
            capacity,
            clock,
        }
    }

    // == Set ==
    /// Stores `value` under `key` in `bucket`, creating the bucket if needed.
    pub fn set(&self, bucket: &str, key: &str, value: Vec<u8>, opts: &CacheOptions) -> Result<()> {
        let store = self.get_or_create(bucket);
        let mut store = store.lock();
        store
            .set(key, value, opts.ttl, opts.eviction_policy)
            .inspect_err(|err| warn!(bucket, key, "set failed: {}", err))
    }

    // == Get ==
    /// Returns the value for `key`, or `None` when the bucket or key is
    /// missing or the record has expired. Never creates a bucket.
    pub fn get(&self, bucket: &str, key: &str, opts: &CacheOptions) -> Result<Option<Vec<u8>>> {
        let Some(store) = self.find(bucket) else {
            return Ok(None);
        };
        let value = store.lock().get(key, opts.evict_on_get);
        Ok(value)
    }

    // == Delete ==
    /// Removes `key` from `bucket`. Missing buckets and keys are a no-op.
    pub fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        if let Some(store) = self.find(bucket) {
            store.lock().delete(key);
        }
        Ok(())
    }

    // == Stats ==
    /// Sums the counters of every bucket existing at call time.
    pub fn stats(&self) -> CacheStats {
        let buckets = self.buckets.read();
        buckets
            .values()
            .fold(CacheStats::new(), |mut total, store| {
                total += store.lock().stats();
                total
            })
    }

    /// Number of buckets created so far.
    pub fn bucket_count(&self) -> usize {
        self.buckets.read().len()
    }

    fn find(&self, bucket: &str) -> Option<SharedBucket> {
        self.buckets.read().get(bucket).cloned()
    }

    fn get_or_create(&self, bucket: &str) -> SharedBucket {
        if let Some(store) = self.find(bucket) {
            return store;
        }

        let mut buckets = self.buckets.write();
        // Another writer may have installed it between the two locks
        buckets
            .entry(bucket.to_string())
            .or_insert_with(|| {
                info!(bucket, capacity = self.capacity, "creating bucket");
                Arc::new(Mutex::new(BucketStore::with_clock(
                    self.capacity,
                    self.clock.clone(),
                )))
            })
            .clone()
    }

    #[cfg(test)]
    fn with_bucket<R>(&self, bucket: &str, f: impl FnOnce(&BucketStore) -> R) -> Option<R> {
        self.find(bucket).map(|store| {
            let guard = store.lock();
            f(&guard)
        })
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{EvictionPolicy, ManualClock};
    use crate::error::CacheError;
    use chrono::{DateTime, Duration, Utc};

    fn defaults() -> CacheOptions {
        CacheOptions::default()
    }

    #[test]
    fn test_set_and_get_across_buckets() {
        let cache = CacheManager::new();

        cache.set("bucket1", "key1", b"value1".to_vec(), &defaults()).unwrap();
        cache.set("bucket2", "key1", b"other".to_vec(), &defaults()).unwrap();

        assert_eq!(cache.get("bucket1", "key1", &defaults()).unwrap(), Some(b"value1".to_vec()));
        assert_eq!(cache.get("bucket2", "key1", &defaults()).unwrap(), Some(b"other".to_vec()));
        assert_eq!(cache.bucket_count(), 2);
    }

    #[test]
    fn test_get_and_delete_do_not_create_buckets() {
        let cache = CacheManager::new();

        assert_eq!(cache.get("ghost", "key", &defaults()).unwrap(), None);
        cache.delete("ghost", "key").unwrap();

        assert_eq!(cache.bucket_count(), 0);
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_delete_then_get() {
        let cache = CacheManager::new();

        cache.set("b", "k", b"v".to_vec(), &defaults()).unwrap();
        cache.delete("b", "k").unwrap();

        assert_eq!(cache.get("b", "k", &defaults()).unwrap(), None);
        // The bucket outlives its contents
        assert_eq!(cache.bucket_count(), 1);
    }

    #[test]
    fn test_new_buckets_use_fixed_capacity() {
        let cache = CacheManager::new();
        cache.set("b", "k", vec![], &defaults()).unwrap();

        assert_eq!(cache.with_bucket("b", |s| s.capacity()), Some(BUCKET_CAPACITY));
    }

    #[test]
    fn test_bucket_cycles_with_default_lru() {
        let cache = CacheManager::new();
        let opts = defaults().with_ttl_seconds(0).with_eviction_policy(EvictionPolicy::Lru);

        cache.set("bucket1", "key1", b"value1".to_vec(), &opts).unwrap();
        assert_eq!(cache.get("bucket1", "key1", &opts).unwrap(), Some(b"value1".to_vec()));

        for i in 0..1000 {
            cache.set("bucket1", &format!("r{}", i), b"value1".to_vec(), &opts).unwrap();
            if i >= 255 && i % 255 == 0 {
                let old = format!("r{}", i - 255);
                assert_eq!(cache.get("bucket1", &old, &opts).unwrap(), None);
            }
        }

        assert_eq!(cache.with_bucket("bucket1", |s| s.len()), Some(BUCKET_CAPACITY));
    }

    #[test]
    fn test_errors_forwarded_unchanged() {
        let cache = CacheManager::with_capacity_and_clock(1, Arc::new(SystemClock));
        let opts = defaults().with_eviction_policy(EvictionPolicy::Disabled);

        cache.set("b", "a", b"a".to_vec(), &opts).unwrap();
        let err = cache.set("b", "b", b"b".to_vec(), &opts).unwrap_err();

        assert_eq!(err, CacheError::EvictionDisabled);
        assert_eq!(cache.get("b", "a", &opts.with_evict_on_get(false)).unwrap(), Some(b"a".to_vec()));
    }

    #[test]
    fn test_stats_aggregate_across_buckets() {
        let start = DateTime::parse_from_rfc3339("2021-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let clock = Arc::new(ManualClock::new(start));
        let cache = CacheManager::with_capacity_and_clock(1, clock.clone());
        let no_evict_on_get = defaults().with_evict_on_get(false);

        // Bucket "a": one hit, one eviction, one miss
        cache.set("a", "k1", b"1".to_vec(), &defaults()).unwrap();
        cache.get("a", "k1", &no_evict_on_get).unwrap();
        cache.set("a", "k2", b"2".to_vec(), &defaults()).unwrap();
        cache.get("a", "k1", &no_evict_on_get).unwrap();

        // Bucket "b": one hit, one expiration (which is also a miss)
        let short = defaults().with_ttl(Duration::seconds(1));
        cache.set("b", "k", b"v".to_vec(), &short).unwrap();
        cache.get("b", "k", &no_evict_on_get).unwrap();
        clock.advance(Duration::seconds(2));
        cache.get("b", "k", &no_evict_on_get).unwrap();

        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 2,
                misses: 2,
                evictions: 1,
                expired: 1,
            }
        );
    }

    #[test]
    fn test_concurrent_access_keeps_invariants() {
        let cache = Arc::new(CacheManager::new());

        std::thread::scope(|scope| {
            for worker in 0..8 {
                let cache = cache.clone();
                scope.spawn(move || {
                    for i in 0..500 {
                        let key = format!("w{}-k{}", worker, i);
                        cache.set("shared", &key, key.as_bytes().to_vec(), &defaults()).unwrap();
                        if let Some(value) = cache.get("shared", &key, &defaults()).unwrap() {
                            assert_eq!(value, key.as_bytes());
                        }
                        if i % 3 == 0 {
                            cache.delete("shared", &key).unwrap();
                        }
                        cache.set(&format!("own-{}", worker), &key, vec![], &defaults()).unwrap();
                    }
                });
            }
        });

        assert_eq!(cache.bucket_count(), 9);
        for name in std::iter::once("shared".to_string()).chain((0..8).map(|w| format!("own-{}", w))) {
            cache
                .with_bucket(&name, |store| store.check_invariants())
                .unwrap()
                .unwrap();
        }
        let stats = cache.stats();
        assert_eq!(stats.hits + stats.misses, 8 * 500);
    }
}
