//! Cache Module
//!
//! Provides a bucketed in-memory cache with per-operation eviction policies
//! and lazy TTL expiry.

mod arena;
mod clock;
mod manager;
mod options;
mod policy;
mod record;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use manager::CacheManager;
pub use options::CacheOptions;
pub use policy::EvictionPolicy;
pub use record::Record;
pub use stats::CacheStats;
pub use store::BucketStore;

// == Public Constants ==
/// Number of records every bucket can hold
pub const BUCKET_CAPACITY: usize = 255;
