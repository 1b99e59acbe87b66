//! A counting cache that counts nothing.

use super::CountingCache;

/// Null-object counting cache.
///
/// `add` reports the delta as if the key had just been created, then forgets it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCountingCache;

impl NoopCountingCache {
    /// Creates a no-op counting cache.
    pub fn new() -> Self {
        Self
    }
}

impl CountingCache for NoopCountingCache {
    fn get(&self, _key: &str) -> i64 {
        0
    }

    fn for_each(&self, _visit: &mut dyn FnMut(&str, i64)) {}

    fn add(&self, _key: &str, n: i64) -> i64 {
        n
    }

    fn remove(&self, _key: &str) -> i64 {
        0
    }

    fn clear(&self) {}

    fn len(&self) -> usize {
        0
    }
}
