//! Configuration Module
//!
//! Loads cache settings from environment variables or any serde source and
//! builds the configured cache.

use std::env;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::cache::{Cache, LruCache, NoopCache, TtlCache};
use crate::counting::{CountingCache, FrequencyCache, NoopCountingCache};
use crate::error::{CacheError, Result};

// == Eviction Policy ==
/// Which cache implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// Least recently used eviction, no expiry
    Lru,
    /// Least recently used eviction with per-entry TTL
    #[default]
    Ttl,
    /// Cache nothing
    Noop,
}

impl FromStr for EvictionPolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(EvictionPolicy::Lru),
            "ttl" => Ok(EvictionPolicy::Ttl),
            "noop" | "none" => Ok(EvictionPolicy::Noop),
            other => Err(CacheError::invalid(format!("unknown eviction policy '{}'", other))),
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EvictionPolicy::Lru => "lru",
            EvictionPolicy::Ttl => "ttl",
            EvictionPolicy::Noop => "noop",
        };
        f.write_str(name)
    }
}

// == Cache Config ==
/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Eviction policy for key/value caches
    pub policy: EvictionPolicy,
    /// Maximum number of entries a key/value cache can hold
    pub capacity: usize,
    /// TTL in seconds for entries of a TTL cache
    pub ttl_secs: u64,
    /// Maximum number of keys a counting cache tracks
    pub counting_capacity: usize,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_POLICY` - `lru`, `ttl` or `noop` (default: ttl)
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL` - Entry TTL in seconds (default: 300)
    /// - `COUNTING_CAPACITY` - Maximum counted keys (default: 100)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            policy: env_or("CACHE_POLICY", defaults.policy),
            capacity: env_or("CACHE_CAPACITY", defaults.capacity),
            ttl_secs: env_or("CACHE_TTL", defaults.ttl_secs),
            counting_capacity: env_or("COUNTING_CAPACITY", defaults.counting_capacity),
        }
    }

    /// Returns the configured TTL.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    // == Build Cache ==
    /// Builds the key/value cache selected by `policy`.
    ///
    /// Fails with `InvalidArgument` if the capacity or TTL is out of range for
    /// the chosen policy.
    pub fn build_cache<K, V>(&self) -> Result<Box<dyn Cache<K, V> + Send + Sync>>
    where
        K: Eq + Hash + Clone + Send + 'static,
        V: Clone + Send + 'static,
    {
        let cache: Box<dyn Cache<K, V> + Send + Sync> = match self.policy {
            EvictionPolicy::Lru => Box::new(LruCache::new(self.capacity)?),
            EvictionPolicy::Ttl => Box::new(TtlCache::new(self.capacity, self.ttl())?),
            EvictionPolicy::Noop => Box::new(NoopCache::new()),
        };
        Ok(cache)
    }

    // == Build Counting Cache ==
    /// Builds a frequency cache, or a no-op counting cache for the `noop` policy.
    pub fn build_counting_cache(&self) -> Result<Box<dyn CountingCache + Send + Sync>> {
        let cache: Box<dyn CountingCache + Send + Sync> = match self.policy {
            EvictionPolicy::Noop => Box::new(NoopCountingCache::new()),
            _ => Box::new(FrequencyCache::new(self.counting_capacity)?),
        };
        Ok(cache)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            policy: EvictionPolicy::Ttl,
            capacity: 1000,
            ttl_secs: 300,
            counting_capacity: 100,
        }
    }
}

fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr + fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, fallback = %default, "ignoring unparseable setting");
            default
        }),
        Err(_) => default,
    }
}
