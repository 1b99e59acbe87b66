//! Cache Entry Module
//!
//! A stored value paired with the deadline after which it stops being visible.

use chrono::{DateTime, Duration, Utc};

// == Cache Entry ==
/// A value stored by the TTL cache together with its deadline.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<V> {
    /// Instant at which the entry expires
    pub deadline: DateTime<Utc>,
    /// The stored value
    pub value: V,
}

impl<V> Entry<V> {
    // == Constructor ==
    /// Creates an entry that lives for `ttl` starting at `now`.
    ///
    /// Deadlines past the representable range saturate to the maximum instant.
    pub fn new(value: V, now: DateTime<Utc>, ttl: Duration) -> Self {
        let deadline = now
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self { deadline, value }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// An entry is live strictly before its deadline; at the deadline itself it
    /// is already expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.deadline
    }

    // == Time To Live ==
    /// Returns the remaining lifetime as of `now`, or zero once expired.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        if self.is_expired(now) {
            Duration::zero()
        } else {
            self.deadline - now
        }
    }
}
