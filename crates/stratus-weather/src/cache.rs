//! In-memory TTL cache for decoded API responses.
//!
//! Entries are keyed by the exact request URL. A stale entry is evicted the
//! moment a read finds it; nothing sweeps the map in the background, and there
//! is no size bound since a session only ever produces a handful of distinct
//! queries.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde_json::Value;

/// Default freshness window (5 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Value,
    inserted_at: Instant,
}

/// Thread-safe response cache with a fixed freshness window.
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Freshness window applied to every entry
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a copy of the cached payload for `key` if it is still fresh.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.get_at(key, Instant::now())
    }

    /// Same as [`get`](Self::get) with an explicit clock reading.
    pub fn get_at(&self, key: &str, now: Instant) -> Option<Value> {
        let mut entries = self.entries.lock();
        let entry = entries.get(key)?;

        if now.saturating_duration_since(entry.inserted_at) < self.ttl {
            return Some(entry.payload.clone());
        }

        tracing::debug!("Evicting stale cache entry ({} entries before)", entries.len());
        entries.remove(key);
        None
    }

    /// Insert or replace the entry for `key`.
    pub fn put(&self, key: impl Into<String>, payload: Value) {
        self.put_at(key, payload, Instant::now());
    }

    /// Same as [`put`](Self::put) with an explicit insertion time.
    pub fn put_at(&self, key: impl Into<String>, payload: Value, at: Instant) {
        self.entries.lock().insert(
            key.into(),
            CacheEntry {
                payload,
                inserted_at: at,
            },
        );
    }

    /// Drop every entry, fresh or not.
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        let count = entries.len();
        entries.clear();
        tracing::info!("Cleared {} cached responses", count);
    }

    /// Number of entries currently held, including stale ones not yet read.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Whether an entry exists for `key`, without checking freshness.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }
}
