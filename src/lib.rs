//! Bucket Cache - A shared, bucketed in-memory cache server
//!
//! Named buckets of 255 records each, with per-write eviction policies
//! (LRU, MRU, oldest, newest, disabled) and lazily enforced TTLs.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::CacheManager;
pub use config::Config;
