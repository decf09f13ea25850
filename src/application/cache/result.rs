//! Time-boxed result cache keyed by analytics category.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Category, Payload};
use crate::error::Result;

/// Default time a stored result stays valid.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// One stored category result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub category: Category,
    pub payload: Payload,
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    /// True while `now - stored_at < ttl`.
    #[must_use]
    pub fn is_fresh_at(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        now.signed_duration_since(self.stored_at) < ttl
    }
}

/// Why a present entry was not served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// Older than the TTL.
    Expired,
    /// Fresh but empty, which marks a failed collection.
    Empty,
}

/// Outcome of a cache lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Hit(Payload),
    Miss,
    /// Entry present but unusable; the caller recomputes.
    Stale(StaleReason),
}

/// Shared, thread-safe result cache.
///
/// Entries are never evicted; they are overwritten by later results or
/// ignored once stale.
pub struct ResultCache {
    entries: RwLock<HashMap<Category, CacheEntry>>,
    ttl: TimeDelta,
}

impl ResultCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Snapshot of the stored entry, valid or not.
    #[must_use]
    pub fn get(&self, category: Category) -> Option<CacheEntry> {
        self.entries.read().get(&category).cloned()
    }

    /// Store `payload`, replacing any previous entry and resetting its age.
    pub fn put(&self, category: Category, payload: Payload) {
        self.put_at(category, payload, Utc::now());
    }

    /// Store `payload` with an explicit timestamp.
    pub fn put_at(&self, category: Category, payload: Payload, stored_at: DateTime<Utc>) {
        let entry = CacheEntry {
            category,
            payload,
            stored_at,
        };
        self.entries.write().insert(category, entry);
    }

    /// True when the entry for `category` may be served now.
    #[must_use]
    pub fn is_valid(&self, category: Category) -> bool {
        self.is_valid_at(category, Utc::now())
    }

    #[must_use]
    pub fn is_valid_at(&self, category: Category, now: DateTime<Utc>) -> bool {
        matches!(self.lookup_at(category, now), CacheLookup::Hit(_))
    }

    /// Classify the entry for `category` as hit, miss or stale.
    #[must_use]
    pub fn lookup(&self, category: Category) -> CacheLookup {
        self.lookup_at(category, Utc::now())
    }

    #[must_use]
    pub fn lookup_at(&self, category: Category, now: DateTime<Utc>) -> CacheLookup {
        let entries = self.entries.read();
        let Some(entry) = entries.get(&category) else {
            return CacheLookup::Miss;
        };
        if !entry.is_fresh_at(now, self.ttl) {
            return CacheLookup::Stale(StaleReason::Expired);
        }
        if entry.payload.is_empty() {
            return CacheLookup::Stale(StaleReason::Empty);
        }
        CacheLookup::Hit(entry.payload.clone())
    }

    /// Number of stored entries, including stale ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize every entry as a JSON object keyed by category name.
    pub fn export_json(&self) -> Result<String> {
        let entries = self.entries.read();
        let map: HashMap<&'static str, &CacheEntry> =
            entries.iter().map(|(c, e)| (c.as_str(), e)).collect();
        Ok(serde_json::to_string(&map)?)
    }

    /// Load entries produced by [`export_json`](Self::export_json).
    ///
    /// Entries that do not parse, or whose key disagrees with their category,
    /// are skipped. Returns the number of entries loaded.
    pub fn import_json(&self, json: &str) -> usize {
        let map: HashMap<String, serde_json::Value> = match serde_json::from_str(json) {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, "Persisted cache is not a JSON object, ignoring");
                return 0;
            }
        };

        let mut loaded = 0;
        let mut entries = self.entries.write();
        for (key, value) in map {
            match serde_json::from_value::<CacheEntry>(value) {
                Ok(entry) if entry.category.as_str() == key => {
                    entries.insert(entry.category, entry);
                    loaded += 1;
                }
                Ok(entry) => {
                    debug!(key = %key, category = %entry.category, "Cache entry key mismatch, skipping");
                }
                Err(e) => {
                    debug!(key = %key, error = %e, "Malformed cache entry, skipping");
                }
            }
        }
        loaded
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
