//! TTL Cache Module
//!
//! LRU cache whose entries also expire a fixed duration after they were last
//! written. When the cache is full, an expired entry is reclaimed in preference
//! to the least recently used live one.

use std::hash::Hash;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use tracing::{debug, info, trace};

use super::{BoundedLru, Cache, CacheStats, Entry};
use crate::clock::{SystemTimeSource, TimeSource};
use crate::error::{CacheError, Result};

#[derive(Debug)]
struct TtlState<K, V> {
    store: BoundedLru<K, Entry<V>>,
    stats: CacheStats,
}

impl<K, V> TtlState<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Live Entry ==
    /// Looks up `key`, promoting it if live and dropping it if expired.
    fn live_entry(&mut self, key: &K, now: DateTime<Utc>) -> Option<&Entry<V>> {
        let expired = self.store.get(key)?.is_expired(now);

        if expired {
            self.store.remove(key);
            self.stats.record_expirations(1);
            trace!("TTL cache dropped expired entry on lookup");
            return None;
        }

        self.store.peek(key)
    }

    /// Removes the least recently used expired entry, if any.
    fn reclaim_expired(&mut self, now: DateTime<Utc>) -> bool {
        let victim = self
            .store
            .iter()
            .find(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone());

        match victim {
            Some(key) => {
                self.store.remove(&key);
                self.stats.record_expirations(1);
                debug!("TTL cache reclaimed expired entry to make room");
                true
            }
            None => false,
        }
    }
}

// == TTL Cache ==
/// Fixed-size LRU cache with a time-to-live for every entry.
///
/// Adding a key always sets its deadline to `now + ttl`. Expired entries are
/// removed lazily, when a lookup touches them or when room is needed, so
/// [`Cache::len`] may count entries that have already expired.
///
/// Any lookup may reorder or delete entries, so all operations take the
/// exclusive lock.
#[derive(Debug)]
pub struct TtlCache<K, V, S = SystemTimeSource> {
    state: Mutex<TtlState<K, V>>,
    capacity: usize,
    ttl: Duration,
    time_source: S,
}

impl<K, V> TtlCache<K, V, SystemTimeSource>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries that each live for `ttl`.
    ///
    /// Fails with `InvalidArgument` if `capacity` or `ttl` is zero.
    pub fn new(capacity: usize, ttl: std::time::Duration) -> Result<Self> {
        Self::with_time_source(capacity, ttl, SystemTimeSource)
    }
}

impl<K, V, S> TtlCache<K, V, S>
where
    K: Eq + Hash + Clone,
    S: TimeSource,
{
    /// Creates a cache that reads the current time from `time_source`.
    pub fn with_time_source(
        capacity: usize,
        ttl: std::time::Duration,
        time_source: S,
    ) -> Result<Self> {
        let store = BoundedLru::new(capacity)?;

        if ttl.is_zero() {
            return Err(CacheError::invalid("must provide a positive TTL"));
        }
        let ttl = Duration::from_std(ttl)
            .map_err(|_| CacheError::invalid(format!("TTL {:?} is out of range", ttl)))?;

        info!(capacity, ttl_ms = ttl.num_milliseconds(), "TTL cache created");

        Ok(Self {
            state: Mutex::new(TtlState {
                store,
                stats: CacheStats::new(),
            }),
            capacity,
            ttl,
            time_source,
        })
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the lifetime given to each added entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Time To Live ==
    /// Returns how long the entry under `key` has left to live.
    ///
    /// Does not change recency. Returns `None` for absent or expired keys.
    pub fn time_to_live(&self, key: &K) -> Option<Duration> {
        let now = self.time_source.now();
        let state = self.state.lock();
        state
            .store
            .peek(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.remaining(now))
    }

    // == Purge Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.time_source.now();
        let mut state = self.state.lock();

        let expired_keys: Vec<K> = state
            .store
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            state.store.remove(key);
        }

        let count = expired_keys.len();
        state.stats.record_expirations(count);
        if count > 0 {
            debug!(removed = count, "TTL cache purged expired entries");
        }
        count
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        let mut stats = state.stats.clone();
        stats.set_total_entries(state.store.len());
        stats
    }
}

impl<K, V, S> Cache<K, V> for TtlCache<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: TimeSource,
{
    fn get(&self, key: &K) -> Option<V> {
        let now = self.time_source.now();
        let mut state = self.state.lock();

        let found = state.live_entry(key, now).map(|entry| entry.value.clone());
        match found {
            Some(_) => state.stats.record_hit(),
            None => state.stats.record_miss(),
        }
        found
    }

    fn add(&self, key: K, value: V) -> bool {
        let now = self.time_source.now();
        let mut state = self.state.lock();

        let exists = state.live_entry(&key, now).is_some();
        if !exists && state.store.len() >= self.capacity {
            state.reclaim_expired(now);
        }

        if state.store.put(key, Entry::new(value, now, self.ttl)) {
            state.stats.record_eviction();
            debug!(len = state.store.len(), "TTL cache evicted least recently used live entry");
        }

        exists
    }

    fn remove(&self, key: &K) -> bool {
        let now = self.time_source.now();
        let mut state = self.state.lock();

        if state.live_entry(key, now).is_some() {
            state.store.remove(key)
        } else {
            false
        }
    }

    fn clear(&self) {
        self.state.lock().store.purge();
    }

    fn len(&self) -> usize {
        self.state.lock().store.len()
    }

    fn for_each(&self, visit: &mut dyn FnMut(&K, &V)) {
        let now = self.time_source.now();
        let state = self.state.lock();

        for (key, entry) in state.store.iter() {
            if !entry.is_expired(now) {
                visit(key, &entry.value);
            }
        }
    }
}
