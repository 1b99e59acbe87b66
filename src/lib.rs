//! Mini Cache - Bounded in-memory caches
//!
//! Provides three interchangeable eviction policies behind one [`Cache`] trait
//! (plain LRU, LRU with per-entry TTL, and a no-op cache) plus a
//! [`CountingCache`] that keeps the highest counts and evicts randomly among the
//! lowest.
//!
//! Every cache guards its own state, so a single handle can be shared between
//! threads. Expiry and eviction happen lazily, inside the call that needs them;
//! no background task runs.

pub mod cache;
pub mod clock;
pub mod config;
pub mod counting;
pub mod error;

pub use cache::{Cache, CacheStats, LruCache, NoopCache, TtlCache};
pub use clock::{ManualTimeSource, SystemTimeSource, TimeSource};
pub use config::{CacheConfig, EvictionPolicy};
pub use counting::{CountingCache, FrequencyCache, NoopCountingCache};
pub use error::{CacheError, Result};
