//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::{CacheOptions, EvictionPolicy};
use crate::error::{CacheError, Result};

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `bucket`: Bucket to write into (created on first write)
/// - `key`: The cache key to store the value under
/// - `value`: The value to store
/// - `options`: Optional TTL and eviction policy (server defaults if omitted)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub bucket: String,
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub options: Option<SetOptions>,
}

/// Per-request write options.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetOptions {
    /// TTL in seconds, zero or negative for no expiry
    #[serde(default)]
    pub ttl_seconds: i64,
    /// Policy name, e.g. "LRU" or "EVICTION_OLDEST"; absent means LRU
    #[serde(default)]
    pub eviction_policy: Option<String>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.bucket.is_empty() {
            return Some("Bucket cannot be empty".to_string());
        }
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        // Bucket and key are single path segments on the read and delete routes
        if self.bucket.contains('/') || self.key.contains('/') {
            return Some("Bucket and key cannot contain '/'".to_string());
        }
        None
    }

    /// Resolves the options for this write.
    ///
    /// Without an `options` object the server defaults apply. With one, its
    /// TTL and policy replace the defaults; evict-on-get is kept.
    pub fn cache_options(&self, defaults: &CacheOptions) -> Result<CacheOptions> {
        let Some(options) = &self.options else {
            return Ok(*defaults);
        };

        let policy = match options.eviction_policy.as_deref() {
            Some(name) => name.parse::<EvictionPolicy>()?,
            None => EvictionPolicy::Lru,
        };

        Ok(defaults
            .with_ttl_seconds(options.ttl_seconds)
            .with_eviction_policy(policy))
    }

    /// Validates and resolves options in one step.
    pub fn into_parts(self, defaults: &CacheOptions) -> Result<(String, String, Vec<u8>, CacheOptions)> {
        if let Some(error_msg) = self.validate() {
            return Err(CacheError::InvalidRequest(error_msg));
        }
        let opts = self.cache_options(defaults)?;
        Ok((self.bucket, self.key, self.value.into_bytes(), opts))
    }
}
