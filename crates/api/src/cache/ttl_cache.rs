use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::Serialize;
use tokio::time::Instant;

struct Entry<V> {
    value: Arc<V>,
    expires_at: Instant,
}

impl<V> Entry<V> {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Entries that would still be served right now.
    pub live_entries: usize,
    /// Everything in the map, including expired entries not yet evicted.
    pub stored_entries: usize,
    pub ttl_seconds: u64,
    pub hits: u64,
    pub misses: u64,
}

/// A string-keyed map whose entries expire a fixed time after insertion.
///
/// Reads take the shared lock; expired entries are evicted lazily on lookup
/// or in bulk by [`TtlCache::purge_expired`]. Values are handed out as `Arc`s
/// so a hit never clones the payload.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if entry.is_live(Instant::now()) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(Arc::clone(&entry.value));
                }
                Some(_) => {}
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
            }
        }

        // Expired under the read lock. Another writer may have refreshed the
        // key in between, so check again before evicting.
        let mut entries = self.entries.write();
        if let Some(entry) = entries.get(key) {
            if entry.is_live(Instant::now()) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(Arc::clone(&entry.value));
            }
            entries.remove(key);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store `value` under `key`, replacing any previous entry and restarting its TTL.
    pub fn put(&self, key: impl Into<String>, value: Arc<V>) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.write().insert(key.into(), entry);
    }

    /// Drop every entry. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write();
        let removed = entries.len();
        entries.clear();
        removed
    }

    /// Evict entries whose TTL has elapsed. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.entries.read();
        CacheStats {
            live_entries: entries.values().filter(|e| e.is_live(now)).count(),
            stored_entries: entries.len(),
            ttl_seconds: self.ttl.as_secs(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
