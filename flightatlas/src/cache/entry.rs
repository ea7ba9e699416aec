//! Cache entry envelope and validity policies.

use std::time::Duration;

use chrono::{DateTime, Datelike, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::CacheError;

/// Default maximum age for a cached entry: 24 hours.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// A persisted payload plus the timestamp it was fetched at.
///
/// The timestamp is the entry's validity tag; the policy decides how long
/// it is trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedEntry<T> {
    pub payload: T,
    pub fetched_at: DateTime<Utc>,
}

impl<T: Serialize + DeserializeOwned> CachedEntry<T> {
    /// Wraps a payload with the given fetch timestamp.
    pub fn new(payload: T, fetched_at: DateTime<Utc>) -> Self {
        Self { payload, fetched_at }
    }

    /// Encodes the entry for the key-value store.
    pub fn encode(&self) -> Result<String, CacheError> {
        serde_json::to_string(self).map_err(|e| CacheError::Codec(e.to_string()))
    }

    /// Decodes an entry previously written with [`encode`](Self::encode).
    pub fn decode(raw: &str) -> Result<Self, CacheError> {
        serde_json::from_str(raw).map_err(|e| CacheError::Codec(e.to_string()))
    }
}

/// When a cached entry stops being trusted.
///
/// Two equivalent policies appear in the system's history; both are kept
/// and either may be configured, as long as it is applied consistently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValidityPolicy {
    /// Valid while the stored calendar month matches the current one.
    CalendarMonth,
    /// Valid while `now - fetched_at` is strictly below the given age.
    MaxAge(Duration),
}

impl ValidityPolicy {
    /// True if an entry fetched at `fetched_at` is still trusted at `now`.
    ///
    /// A stale entry must trigger a fresh fetch, never silent reuse.
    pub fn is_valid(&self, fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            ValidityPolicy::CalendarMonth => {
                (fetched_at.year(), fetched_at.month()) == (now.year(), now.month())
            }
            ValidityPolicy::MaxAge(max_age) => {
                let Ok(max_age) = chrono::Duration::from_std(*max_age) else {
                    return false;
                };
                now.signed_duration_since(fetched_at) < max_age
            }
        }
    }
}

impl Default for ValidityPolicy {
    fn default() -> Self {
        ValidityPolicy::MaxAge(DEFAULT_MAX_AGE)
    }
}
