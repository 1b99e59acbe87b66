//! LRU Cache Module
//!
//! Thread-safe least-recently-used cache on top of [`BoundedLru`].

use std::hash::Hash;

use parking_lot::Mutex;
use tracing::{debug, info};

use super::{BoundedLru, Cache, CacheStats};
use crate::error::Result;

#[derive(Debug)]
struct LruState<K, V> {
    store: BoundedLru<K, V>,
    stats: CacheStats,
}

// == LRU Cache ==
/// Fixed-size cache that evicts the least recently used entry when full.
///
/// Lookups reorder the recency list, so every operation, `get` included, runs
/// under the exclusive lock.
#[derive(Debug)]
pub struct LruCache<K, V> {
    state: Mutex<LruState<K, V>>,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// Fails with `InvalidArgument` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        let store = BoundedLru::new(capacity)?;
        info!(capacity, "LRU cache created");

        Ok(Self {
            state: Mutex::new(LruState {
                store,
                stats: CacheStats::new(),
            }),
        })
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.state.lock().store.capacity()
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

impl<K, V> Cache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn get(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock();
        let found = state.store.get(key).cloned();
        match found {
            Some(_) => state.stats.record_hit(),
            None => state.stats.record_miss(),
        }
        found
    }

    fn add(&self, key: K, value: V) -> bool {
        let mut state = self.state.lock();
        let existed = state.store.contains(&key);

        if state.store.put(key, value) {
            state.stats.record_eviction();
            debug!(len = state.store.len(), "LRU cache evicted least recently used entry");
        }

        existed
    }

    fn remove(&self, key: &K) -> bool {
        self.state.lock().store.remove(key)
    }

    fn clear(&self) {
        self.state.lock().store.purge();
    }

    fn len(&self) -> usize {
        self.state.lock().store.len()
    }

    fn for_each(&self, visit: &mut dyn FnMut(&K, &V)) {
        let state = self.state.lock();
        for (key, value) in state.store.iter() {
            visit(key, value);
        }
    }
}
