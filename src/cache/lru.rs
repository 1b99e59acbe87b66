//! Bounded LRU Store Module
//!
//! Fixed-capacity key/value store that tracks access order and evicts the least
//! recently used key when an insert would overflow it.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use crate::error::{CacheError, Result};

// == Bounded LRU ==
/// Capacity-bounded map with least-recently-used eviction.
///
/// Keys are kept in a VecDeque where:
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Promoting or removing a key scans the recency queue, so `get`, `put` and
/// `remove` are O(n) in the number of stored entries.
#[derive(Debug, Clone)]
pub struct BoundedLru<K, V> {
    /// Key-value storage
    entries: HashMap<K, V>,
    /// Order of keys by access time
    order: VecDeque<K>,
    /// Maximum number of entries
    capacity: usize,
}

impl<K, V> BoundedLru<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates an empty store holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::invalid("must provide a positive size"));
        }

        Ok(Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        })
    }

    // == Touch ==
    /// Marks a key as recently used (moves to front).
    fn touch(&mut self, key: &K) {
        if self.order.front() == Some(key) {
            return;
        }
        self.forget(key);
        self.order.push_front(key.clone());
    }

    fn forget(&mut self, key: &K) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if !self.entries.contains_key(key) {
            return None;
        }
        self.touch(key);
        self.entries.get(key)
    }

    // == Peek ==
    /// Returns the value for `key` without changing its recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Checks for `key` without changing its recency.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    // == Put ==
    /// Stores a value and marks the key most recently used.
    ///
    /// Returns `true` if the least recently used entry was evicted to make room.
    /// Replacing an existing key never evicts.
    pub fn put(&mut self, key: K, value: V) -> bool {
        let mut evicted = false;

        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_back() {
                self.entries.remove(&oldest);
                evicted = true;
            }
        }

        self.touch(&key);
        self.entries.insert(key, value);
        evicted
    }

    // == Remove ==
    /// Removes `key`, returning `true` if it was present.
    pub fn remove(&mut self, key: &K) -> bool {
        if self.entries.remove(key).is_some() {
            self.forget(key);
            true
        } else {
            false
        }
    }

    // == Keys ==
    /// Iterates keys from least to most recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.order.iter().rev()
    }

    /// Iterates entries from least to most recently used without promoting them.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.order
            .iter()
            .rev()
            .filter_map(move |k| self.entries.get(k).map(|v| (k, v)))
    }

    // == Length ==
    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Purge ==
    /// Drops every entry.
    pub fn purge(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
