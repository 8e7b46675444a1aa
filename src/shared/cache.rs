//! In-process TTL cache shared by the alert decision memo and the pollution
//! response cache.

use dashmap::DashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Point-in-time view of a cache, for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub name: &'static str,
    pub entries: usize,
    pub ttl: Duration,
}

/// Upper bound on how often expired entries are swept
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct TtlCache<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    name: &'static str,
    entries: Arc<DashMap<K, CacheEntry<V>>>,
    ttl: Duration,
    last_cleanup: Arc<Mutex<Instant>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            entries: Arc::new(DashMap::new()),
            ttl,
            last_cleanup: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Sweeps expired entries at most once per `min(ttl, CLEANUP_INTERVAL)`
    fn maybe_cleanup(&self) {
        let interval = self.ttl.min(CLEANUP_INTERVAL);

        if let Ok(mut last_cleanup) = self.last_cleanup.try_lock() {
            if last_cleanup.elapsed() >= interval {
                *last_cleanup = Instant::now();
                drop(last_cleanup);
                self.purge_expired();
            }
        }
    }

    /// Returns the cached value unless it has expired; expired entries are dropped.
    pub fn get(&self, key: &K) -> Option<V> {
        self.maybe_cleanup();

        let now = Instant::now();
        let hit = self.entries.get(key).map(|entry| {
            if entry.is_expired(now) {
                None
            } else {
                Some(entry.value.clone())
            }
        })?;

        if hit.is_none() {
            self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        }
        hit
    }

    pub fn insert(&self, key: K, value: V) {
        // A zero TTL disables caching entirely
        if self.ttl.is_zero() {
            return;
        }
        self.maybe_cleanup();

        self.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    pub fn invalidate(&self, key: &K) {
        self.entries.remove(key);
    }

    /// Drops every entry whose key matches the predicate
    pub fn invalidate_where<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(&K) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|key, _| !predicate(key));
        before.saturating_sub(self.entries.len())
    }

    fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            name: self.name,
            entries: self.entries.len(),
            ttl: self.ttl,
        }
    }
}
