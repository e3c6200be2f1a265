//! Generic key/value cache with per-entry time-to-live.
//!
//! Expiry is lazy: there is no background sweep. An expired entry is treated
//! as absent and removed by the lookup that finds it.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::{instrument, trace};

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    stored_at: Instant,
}

impl<V> Entry<V> {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() >= ttl
    }
}

/// Thread-safe TTL cache.
///
/// A TTL of zero disables caching: every [`Cache::load`] misses.
///
/// Without a maximum the cache grows with the number of distinct keys stored;
/// use [`Cache::with_max_entries`] to bound it.
#[derive(Debug)]
pub struct Cache<K, V> {
    entries: RwLock<HashMap<K, Entry<V>>>,
    ttl: Duration,
    max_entries: Option<usize>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    /// Creates an unbounded cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_entries: None,
        }
    }

    /// Creates a cache holding at most `max_entries` entries.
    ///
    /// When full, storing a new key first drops expired entries and then,
    /// if still full, the oldest entry. A maximum of zero disables caching.
    pub fn with_max_entries(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_entries: Some(max_entries),
        }
    }

    /// Returns the time-to-live of entries.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the value stored under `key` if it has not expired.
    ///
    /// An expired entry is removed as a side effect.
    #[instrument(level = "trace", skip(self))]
    pub fn load(&self, key: &K) -> Option<V> {
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            match entries.get(key) {
                None => {
                    trace!("Cache miss");
                    return None;
                }
                Some(entry) if !entry.is_expired(self.ttl) => {
                    trace!("Cache hit");
                    return Some(entry.value.clone());
                }
                Some(_) => {}
            }
        }

        // Re-check under the write lock: a concurrent store may have refreshed it.
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.get(key).is_some_and(|e| e.is_expired(self.ttl)) {
            entries.remove(key);
            trace!("Expired entry removed");
        }
        None
    }

    /// Stores `value` under `key`, replacing any previous entry and
    /// restarting its time-to-live.
    #[instrument(level = "trace", skip(self, value))]
    pub fn store(&self, key: K, value: V) {
        if self.max_entries == Some(0) {
            return;
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(max) = self.max_entries
            && !entries.contains_key(&key)
            && entries.len() >= max
        {
            let ttl = self.ttl;
            entries.retain(|_, e| !e.is_expired(ttl));
            if entries.len() >= max
                && let Some(oldest) = entries
                    .iter()
                    .min_by_key(|(_, e)| e.stored_at)
                    .map(|(k, _)| k.clone())
            {
                trace!(evicted = ?oldest, "Cache full, evicting oldest entry");
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Removes `key`. Removing an absent key is a no-op.
    #[instrument(level = "trace", skip(self))]
    pub fn delete(&self, key: &K) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    /// Returns the number of stored entries, including expired ones not yet removed.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
