//! Eviction Policy Module
//!
//! Maps a requested eviction policy to the record that should be removed.

use std::fmt;
use std::str::FromStr;

use crate::cache::arena::{Handle, Order, RecordArena};
use crate::error::{CacheError, Result};

// == Eviction Policy ==
/// Which record to free when a bucket is at capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EvictionPolicy {
    /// Least recently used
    #[default]
    Lru,
    /// Most recently used
    Mru,
    /// Earliest inserted
    Oldest,
    /// Latest inserted
    Newest,
    /// Never evict; writes at capacity are rejected
    Disabled,
}

impl EvictionPolicy {
    /// Canonical upper-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            EvictionPolicy::Lru => "LRU",
            EvictionPolicy::Mru => "MRU",
            EvictionPolicy::Oldest => "OLDEST",
            EvictionPolicy::Newest => "NEWEST",
            EvictionPolicy::Disabled => "DISABLED",
        }
    }

    // == Select Victim ==
    /// Picks the eviction candidate for this policy.
    ///
    /// Returns `EvictionDisabled` for `Disabled`, and `None` when the arena
    /// has nothing to give up.
    pub(crate) fn select_victim(self, arena: &RecordArena) -> Result<Option<Handle>> {
        let victim = match self {
            EvictionPolicy::Lru => arena.tail(Order::Recency),
            EvictionPolicy::Mru => arena.head(Order::Recency),
            EvictionPolicy::Oldest => arena.head(Order::Insertion),
            EvictionPolicy::Newest => arena.tail(Order::Insertion),
            EvictionPolicy::Disabled => return Err(CacheError::EvictionDisabled),
        };
        Ok(victim)
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Parsing ==
/// Accepts the canonical names case-insensitively, with or without an
/// `EVICTION_` prefix. Empty and `UNSPECIFIED` mean LRU.
impl FromStr for EvictionPolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        let name = upper.strip_prefix("EVICTION_").unwrap_or(upper.as_str());
        match name {
            "" | "UNSPECIFIED" | "LRU" => Ok(EvictionPolicy::Lru),
            "MRU" => Ok(EvictionPolicy::Mru),
            "OLDEST" => Ok(EvictionPolicy::Oldest),
            "NEWEST" => Ok(EvictionPolicy::Newest),
            "DISABLED" => Ok(EvictionPolicy::Disabled),
            _ => Err(CacheError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Numeric wire values: 0 unspecified, 1 LRU, 2 MRU, 3 OLDEST, 4 NEWEST, 5 DISABLED.
impl TryFrom<i32> for EvictionPolicy {
    type Error = CacheError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 | 1 => Ok(EvictionPolicy::Lru),
            2 => Ok(EvictionPolicy::Mru),
            3 => Ok(EvictionPolicy::Oldest),
            4 => Ok(EvictionPolicy::Newest),
            5 => Ok(EvictionPolicy::Disabled),
            other => Err(CacheError::UnknownPolicy(other.to_string())),
        }
    }
}
