//! Cache Module
//!
//! Bounded key/value caches sharing one interface: plain LRU, LRU with
//! per-entry TTL, and a no-op cache for callers that want caching disabled.

mod entry;
mod lru;
mod lru_cache;
mod noop;
mod stats;
mod ttl;


// Re-export public types
pub use entry::Entry;
pub use lru::BoundedLru;
pub use lru_cache::LruCache;
pub use noop::NoopCache;
pub use stats::CacheStats;
pub use ttl::TtlCache;

// == Cache Trait ==
/// A bounded key/value cache.
///
/// Every method takes `&self`; implementations guard their state internally so a
/// single handle can be shared across threads.
pub trait Cache<K, V> {
    /// Returns a copy of the value stored under `key`, if present.
    fn get(&self, key: &K) -> Option<V>;

    /// Stores `value` under `key`. Returns `true` if it replaced an existing entry.
    fn add(&self, key: K, value: V) -> bool;

    /// Removes `key`. Returns `true` if an entry was removed.
    fn remove(&self, key: &K) -> bool;

    /// Removes every entry.
    fn clear(&self);

    /// Returns the number of stored entries.
    fn len(&self) -> usize;

    /// Returns `true` if no entries are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visits entries from least to most recently used.
    ///
    /// The cache stays locked while `visit` runs, so calling back into the
    /// same cache from inside `visit` deadlocks.
    fn for_each(&self, visit: &mut dyn FnMut(&K, &V));
}
