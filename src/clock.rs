//! Time Source Module
//!
//! Abstracts "now" so TTL deadlines can be tested without sleeping.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

// == Time Source ==
/// Supplies the current time to caches that track deadlines.
pub trait TimeSource: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

// == System Time Source ==
/// Wall-clock time source used outside of tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// == Manual Time Source ==
/// A controllable clock that only moves when told to.
///
/// Clones share the same underlying instant, so a test can hand one clone to a
/// cache and keep another to drive time forward.
#[derive(Debug, Clone)]
pub struct ManualTimeSource {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualTimeSource {
    /// Creates a clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    /// Creates a clock frozen at the current wall-clock time.
    pub fn frozen() -> Self {
        Self::new(Utc::now())
    }

    /// Moves the clock forward by `step`.
    pub fn advance(&self, step: std::time::Duration) {
        let mut current = self.current.lock();
        *current = Duration::from_std(step)
            .ok()
            .and_then(|step| current.checked_add_signed(step))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
    }

    /// Sets the clock to an exact instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.current.lock() = instant;
    }
}

impl Default for ManualTimeSource {
    fn default() -> Self {
        Self::frozen()
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}
