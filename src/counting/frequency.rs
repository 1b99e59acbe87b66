//! Frequency Cache Module
//!
//! Keeps at most `capacity` keys ranked by count. Admitting a new key into a
//! full cache evicts one of the minimum-count keys, chosen uniformly at random.

use std::collections::HashMap;

use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::{CountingCache, MIN_COUNTING_CAPACITY};
use crate::error::{CacheError, Result};

#[derive(Debug, Clone)]
struct CountEntry {
    key: String,
    count: i64,
}

// == Ranking ==
/// Entries sorted by count, descending, plus a key -> position index.
///
/// Entries sharing a count form a contiguous run, so the minimum-count entries
/// are always a suffix of `entries`.
#[derive(Debug, Default)]
struct Ranking {
    lookup: HashMap<String, usize>,
    entries: Vec<CountEntry>,
}

impl Ranking {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn count(&self, key: &str) -> Option<i64> {
        self.lookup.get(key).map(|&idx| self.entries[idx].count)
    }

    /// Position after the last entry whose count is at least `count`.
    fn slot_for(&self, count: i64) -> usize {
        self.entries.partition_point(|e| e.count >= count)
    }

    fn reindex(&mut self, from: usize, to: usize) {
        for idx in from..to {
            if let Some(slot) = self.lookup.get_mut(&self.entries[idx].key) {
                *slot = idx;
            }
        }
    }

    fn insert(&mut self, key: String, count: i64) {
        let pos = self.slot_for(count);
        self.entries.insert(
            pos,
            CountEntry {
                key: key.clone(),
                count,
            },
        );
        self.lookup.insert(key, pos);
        self.reindex(pos + 1, self.entries.len());
    }

    fn remove_at(&mut self, idx: usize) -> CountEntry {
        let entry = self.entries.remove(idx);
        self.lookup.remove(&entry.key);
        self.reindex(idx, self.entries.len());
        entry
    }

    // == Settle ==
    /// Stores a new count for the entry at `idx` and restores the ordering.
    ///
    /// A zero count removes the entry; every deletion of a tracked key goes
    /// through here.
    fn settle(&mut self, idx: usize, count: i64) -> i64 {
        if count == 0 {
            self.remove_at(idx);
            return 0;
        }

        let mut entry = self.entries.remove(idx);
        entry.count = count;
        let pos = self.slot_for(count);
        self.entries.insert(pos, entry);
        self.reindex(idx.min(pos), idx.max(pos) + 1);
        count
    }

    // == Evict ==
    /// Removes one entry picked uniformly among those with the minimum count.
    fn evict<R: Rng>(&mut self, rng: &mut R) -> Option<CountEntry> {
        let min = self.entries.last()?.count;
        let start = self.entries.partition_point(|e| e.count > min);
        let pick = rng.gen_range(start..self.entries.len());
        Some(self.remove_at(pick))
    }

    fn clear(&mut self) {
        self.lookup.clear();
        self.entries.clear();
    }
}

#[derive(Debug)]
struct FrequencyState<R> {
    ranking: Ranking,
    rng: R,
}

// == Frequency Cache ==
/// Tracks integer counts for at most `capacity` string keys.
///
/// When the cache is full, the next new key replaces a random key among those
/// with the smallest count, even if that count is larger than the new key's.
/// Updating a key that is already tracked never evicts anything, and a key
/// whose count reaches zero is dropped.
///
/// `get`, `for_each` and `len` share a read lock; all mutations are exclusive.
#[derive(Debug)]
pub struct FrequencyCache<R = StdRng> {
    state: RwLock<FrequencyState<R>>,
    capacity: usize,
}

impl FrequencyCache<StdRng> {
    // == Constructor ==
    /// Creates a cache for at most `capacity` keys, seeded from OS entropy.
    ///
    /// Fails with `InvalidArgument` if `capacity` is below 2.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_rng(capacity, StdRng::from_entropy())
    }
}

impl<R: Rng> FrequencyCache<R> {
    /// Creates a cache that draws eviction choices from `rng`.
    pub fn with_rng(capacity: usize, rng: R) -> Result<Self> {
        if capacity < MIN_COUNTING_CAPACITY {
            return Err(CacheError::invalid(format!(
                "minimum counting cache size is {}",
                MIN_COUNTING_CAPACITY
            )));
        }

        info!(capacity, "frequency cache created");

        Ok(Self {
            state: RwLock::new(FrequencyState {
                ranking: Ranking::default(),
                rng,
            }),
            capacity,
        })
    }

    /// Returns the maximum number of tracked keys.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns all keys with their counts, highest count first.
    pub fn ranked(&self) -> Vec<(String, i64)> {
        let state = self.state.read();
        state
            .ranking
            .entries
            .iter()
            .map(|e| (e.key.clone(), e.count))
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let state = self.state.read();
        let ranking = &state.ranking;

        assert!(ranking.len() <= self.capacity, "ranking exceeds capacity");
        assert_eq!(ranking.lookup.len(), ranking.entries.len(), "lookup/ranking size mismatch");
        for (idx, entry) in ranking.entries.iter().enumerate() {
            assert_eq!(ranking.lookup.get(&entry.key), Some(&idx), "stale index for {}", entry.key);
            assert_ne!(entry.count, 0, "zero count persisted for {}", entry.key);
        }
        assert!(
            ranking.entries.windows(2).all(|w| w[0].count >= w[1].count),
            "ranking not sorted descending"
        );
    }
}

impl<R: Rng> CountingCache for FrequencyCache<R> {
    fn get(&self, key: &str) -> i64 {
        self.state.read().ranking.count(key).unwrap_or(0)
    }

    fn for_each(&self, visit: &mut dyn FnMut(&str, i64)) {
        let state = self.state.read();
        for entry in &state.ranking.entries {
            visit(&entry.key, entry.count);
        }
    }

    fn add(&self, key: &str, n: i64) -> i64 {
        let mut state = self.state.write();
        let FrequencyState { ranking, rng } = &mut *state;

        if let Some(&idx) = ranking.lookup.get(key) {
            let count = ranking.entries[idx].count.saturating_add(n);
            return ranking.settle(idx, count);
        }

        // Zero-count keys are never admitted.
        if n == 0 {
            return 0;
        }

        while ranking.len() >= self.capacity {
            match ranking.evict(rng) {
                Some(victim) => debug!(
                    key = %victim.key,
                    count = victim.count,
                    "frequency cache evicted minimum-count entry"
                ),
                None => break,
            }
        }

        ranking.insert(key.to_owned(), n);
        n
    }

    fn remove(&self, key: &str) -> i64 {
        let mut state = self.state.write();
        let ranking = &mut state.ranking;

        match ranking.lookup.get(key) {
            Some(&idx) => {
                let previous = ranking.entries[idx].count;
                ranking.settle(idx, 0);
                previous
            }
            None => 0,
        }
    }

    fn clear(&self) {
        self.state.write().ranking.clear();
    }

    fn len(&self) -> usize {
        self.state.read().ranking.len()
    }
}
