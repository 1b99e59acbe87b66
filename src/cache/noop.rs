//! A cache that caches nothing.

use super::Cache;

/// Null-object cache: every lookup misses and every write is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl NoopCache {
    /// Creates a no-op cache.
    pub fn new() -> Self {
        Self
    }
}

impl<K, V> Cache<K, V> for NoopCache {
    fn get(&self, _key: &K) -> Option<V> {
        None
    }

    fn add(&self, _key: K, _value: V) -> bool {
        false
    }

    fn remove(&self, _key: &K) -> bool {
        false
    }

    fn clear(&self) {}

    fn len(&self) -> usize {
        0
    }

    fn for_each(&self, _visit: &mut dyn FnMut(&K, &V)) {}
}
