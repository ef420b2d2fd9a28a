//! Cache Record Module
//!
//! Defines a single stored value with optional absolute expiry.

use chrono::{DateTime, Duration, Utc};

// == Record ==
/// One stored value plus its expiry instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Key the record is stored under
    key: String,
    /// The stored value (zero-length is valid)
    pub value: Vec<u8>,
    /// Absolute expiry instant, None = never expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl Record {
    // == Constructor ==
    /// Creates a record that expires `ttl` after `now`.
    ///
    /// A missing or non-positive TTL means the record never expires.
    pub fn new(key: String, value: Vec<u8>, ttl: Option<Duration>, now: DateTime<Utc>) -> Self {
        Self {
            key,
            value,
            expires_at: expiry_from(ttl, now),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    // == Refresh ==
    /// Replaces value and expiry wholesale, keeping the key.
    pub fn refresh(&mut self, value: Vec<u8>, ttl: Option<Duration>, now: DateTime<Utc>) {
        self.value = value;
        self.expires_at = expiry_from(ttl, now);
    }

    // == Is Expired ==
    /// Checks whether the record has expired at `now`.
    ///
    /// A record is still valid at exactly its expiry instant and expires strictly after it.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now > expires,
            None => false,
        }
    }
}

/// Computes the absolute expiry for a TTL. Overflowing instants never expire.
fn expiry_from(ttl: Option<Duration>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    ttl.filter(|ttl| *ttl > Duration::zero())
        .and_then(|ttl| now.checked_add_signed(ttl))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH
    }

    #[test]
    fn test_record_no_ttl() {
        let record = Record::new("k".to_string(), b"v".to_vec(), None, epoch());

        assert_eq!(record.key(), "k");
        assert!(record.expires_at.is_none());
        assert!(!record.is_expired_at(epoch() + Duration::days(3650)));
    }

    #[test]
    fn test_record_non_positive_ttl_never_expires() {
        let zero = Record::new("k".to_string(), vec![], Some(Duration::zero()), epoch());
        let negative = Record::new("k".to_string(), vec![], Some(Duration::seconds(-5)), epoch());

        assert!(zero.expires_at.is_none());
        assert!(negative.expires_at.is_none());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let record = Record::new("k".to_string(), b"v".to_vec(), Some(Duration::seconds(1)), epoch());

        assert!(!record.is_expired_at(epoch()));
        // Still valid exactly at the expiry instant
        assert!(!record.is_expired_at(epoch() + Duration::seconds(1)));
        assert!(record.is_expired_at(epoch() + Duration::milliseconds(1001)));
    }

    #[test]
    fn test_refresh_replaces_value_and_expiry() {
        let mut record = Record::new("k".to_string(), b"old".to_vec(), Some(Duration::seconds(1)), epoch());
        record.refresh(b"new".to_vec(), None, epoch() + Duration::seconds(5));

        assert_eq!(record.value, b"new");
        assert!(record.expires_at.is_none());
        assert_eq!(record.key(), "k");
    }

    #[test]
    fn test_overflowing_ttl_never_expires() {
        let record = Record::new("k".to_string(), vec![], Some(Duration::days(1_000_000_000)), epoch());
        assert!(record.expires_at.is_none());
    }
}
