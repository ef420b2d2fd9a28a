//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

use crate::cache::{CacheOptions, EvictionPolicy};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// Bucket capacity is fixed and not part of the configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Default TTL in seconds for requests without options (0 = no expiry)
    pub default_ttl: i64,
    /// Eviction policy for requests without options
    pub default_eviction_policy: EvictionPolicy,
    /// Whether reads on a full bucket evict the oldest record
    pub evict_on_get: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DEFAULT_TTL` - Default TTL in seconds, 0 disables expiry (default: 0)
    /// - `DEFAULT_EVICTION_POLICY` - LRU, MRU, OLDEST, NEWEST or DISABLED (default: LRU)
    /// - `EVICT_ON_GET` - Evict the oldest record when reading a full bucket (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            default_ttl: parse_var("DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            default_eviction_policy: parse_var("DEFAULT_EVICTION_POLICY")
                .unwrap_or(defaults.default_eviction_policy),
            evict_on_get: parse_var("EVICT_ON_GET").unwrap_or(defaults.evict_on_get),
        }
    }

    /// Options applied to requests that carry none of their own.
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions::default()
            .with_ttl_seconds(self.default_ttl)
            .with_eviction_policy(self.default_eviction_policy)
            .with_evict_on_get(self.evict_on_get)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            default_ttl: 0,
            default_eviction_policy: EvictionPolicy::Lru,
            evict_on_get: true,
        }
    }
}
