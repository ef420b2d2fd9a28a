//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for the GET operation (GET /get/:bucket/:key)
///
/// A missing key is a successful lookup with `found: false` and no value,
/// which keeps it distinct from a stored empty value.
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub bucket: String,
    pub key: String,
    /// Whether a live record was found
    pub found: bool,
    /// The stored value, absent when not found
    pub value: Option<String>,
}

impl GetResponse {
    /// Creates a new GetResponse from a lookup result
    pub fn new(bucket: impl Into<String>, key: impl Into<String>, value: Option<Vec<u8>>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            found: value.is_some(),
            value: value.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()),
        }
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    pub bucket: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        let bucket = bucket.into();
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully in bucket '{}'", key, bucket),
            bucket,
            key,
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:bucket/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    pub bucket: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        let bucket = bucket.into();
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted from bucket '{}'", key, bucket),
            bucket,
            key,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Number of lazily expired records
    pub expired: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Number of buckets created so far
    pub buckets: usize,
}

impl StatsResponse {
    /// Creates a new StatsResponse from aggregated cache statistics
    pub fn new(stats: CacheStats, buckets: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expired: stats.expired,
            hit_rate: stats.hit_rate(),
            buckets,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
