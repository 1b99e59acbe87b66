//! Counting Module
//!
//! Caches specialized for tracking integer counts per string key.

mod frequency;
mod noop;


pub use frequency::FrequencyCache;
pub use noop::NoopCountingCache;

/// Smallest capacity a [`FrequencyCache`] accepts.
pub const MIN_COUNTING_CAPACITY: usize = 2;

// == Counting Cache Trait ==
/// A cache of integer counts keyed by string.
pub trait CountingCache {
    /// Returns the count for `key`, or 0 if it is not tracked.
    fn get(&self, key: &str) -> i64;

    /// Visits every key and its count. Callers must not depend on the order.
    ///
    /// The cache stays locked while `visit` runs. Calling back into the same
    /// cache from inside `visit`, even with `get`, can deadlock.
    fn for_each(&self, visit: &mut dyn FnMut(&str, i64));

    /// Adds `n` (which may be negative) to the count for `key` and returns the
    /// new count.
    fn add(&self, key: &str, n: i64) -> i64;

    /// Increments the count for `key` and returns its new value.
    fn inc(&self, key: &str) -> i64 {
        self.add(key, 1)
    }

    /// Decrements the count for `key` and returns its new value.
    fn dec(&self, key: &str) -> i64 {
        self.add(key, -1)
    }

    /// Stops tracking `key` and returns its previous count.
    fn remove(&self, key: &str) -> i64;

    /// Removes all keys.
    fn clear(&self);

    /// Returns the number of tracked keys.
    fn len(&self) -> usize;

    /// Returns `true` if no keys are tracked.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
