//! Integration Tests for the public cache API
//!
//! Exercises the caches through their trait objects and from several threads.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use mini_cache::{
    Cache, CacheConfig, CacheError, CountingCache, EvictionPolicy, FrequencyCache, LruCache,
    ManualTimeSource, TtlCache,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// == Helper Functions ==

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_cache=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

fn collect<K, V, C>(cache: &C) -> Vec<(K, V)>
where
    K: Clone,
    V: Clone,
    C: Cache<K, V> + ?Sized,
{
    let mut out = Vec::new();
    cache.for_each(&mut |k, v| out.push((k.clone(), v.clone())));
    out
}

// == Construction ==

#[test]
fn test_constructors_reject_invalid_arguments() {
    assert!(matches!(
        LruCache::<u32, u32>::new(0),
        Err(CacheError::InvalidArgument(_))
    ));
    assert!(matches!(
        TtlCache::<u32, u32>::new(0, Duration::from_secs(1)),
        Err(CacheError::InvalidArgument(_))
    ));
    assert!(matches!(
        TtlCache::<u32, u32>::new(1, Duration::ZERO),
        Err(CacheError::InvalidArgument(_))
    ));
    assert!(matches!(
        FrequencyCache::new(1),
        Err(CacheError::InvalidArgument(_))
    ));
}

#[test]
fn test_huge_capacities_allocate_lazily() -> Result<()> {
    for policy in [EvictionPolicy::Lru, EvictionPolicy::Ttl] {
        let config = CacheConfig {
            policy,
            capacity: usize::MAX,
            counting_capacity: usize::MAX,
            ..CacheConfig::default()
        };
        let cache = config.build_cache::<u32, u32>()?;
        assert!(!cache.add(1, 1));
        assert_eq!(cache.get(&1), Some(1), "policy {}", policy);

        let counts = config.build_counting_cache()?;
        assert_eq!(counts.inc("a"), 1);
        assert_eq!(counts.len(), 1);
    }
    Ok(())
}

// == Trait Objects ==

#[test]
fn test_policies_are_interchangeable() -> Result<()> {
    init_tracing();

    for policy in [EvictionPolicy::Lru, EvictionPolicy::Ttl] {
        let config = CacheConfig {
            policy,
            capacity: 3,
            ..CacheConfig::default()
        };
        let cache = config.build_cache::<String, u32>()?;

        assert!(!cache.add("a".to_string(), 1));
        assert!(!cache.add("b".to_string(), 2));
        assert!(!cache.add("c".to_string(), 3));
        assert!(cache.get(&"a".to_string()).is_some());
        assert!(!cache.add("d".to_string(), 4));

        let keys: Vec<String> = collect(&*cache).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["c", "a", "d"], "policy {}", policy);

        cache.clear();
        assert!(cache.is_empty());
    }

    Ok(())
}

#[test]
fn test_clear_restores_fresh_behavior() -> Result<()> {
    let clock = ManualTimeSource::frozen();
    let cache = TtlCache::with_time_source(2, Duration::from_secs(10), clock.clone())?;

    cache.clear();
    assert_eq!(cache.len(), 0);

    cache.add(1, "one");
    cache.add(2, "two");
    cache.clear();
    assert_eq!(cache.len(), 0);

    assert!(!cache.add(1, "uno"));
    assert!(!cache.add(3, "tres"));
    assert_eq!(collect(&cache), vec![(1, "uno"), (3, "tres")]);

    Ok(())
}

// == Expiry with an injected clock ==

#[test]
fn test_ttl_boundary_with_controlled_clock() -> Result<()> {
    init_tracing();
    let clock = ManualTimeSource::frozen();
    let cache = TtlCache::with_time_source(10, Duration::from_secs(10), clock.clone())?;

    cache.add(1, 101);

    clock.advance(Duration::from_millis(9_999));
    assert_eq!(cache.get(&1), Some(101));

    clock.advance(Duration::from_millis(1));
    assert_eq!(cache.get(&1), None);
    assert!(collect(&cache).is_empty());

    Ok(())
}

// == Concurrency ==

#[test]
fn test_lru_shared_across_threads() -> Result<()> {
    let cache = Arc::new(LruCache::new(64)?);

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..500u32 {
                    let key = (t * 1000 + i) % 200;
                    cache.add(key, i);
                    cache.get(&((key + 1) % 200));
                    if i % 7 == 0 {
                        cache.remove(&key);
                    }
                    assert!(cache.len() <= 64);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    assert!(cache.len() <= 64);
    assert_eq!(cache.stats().total_entries, cache.len());
    Ok(())
}

#[test]
fn test_ttl_shared_across_threads() -> Result<()> {
    let clock = ManualTimeSource::frozen();
    let cache = Arc::new(TtlCache::with_time_source(
        32,
        Duration::from_secs(1),
        clock.clone(),
    )?);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let cache = Arc::clone(&cache);
            let clock = clock.clone();
            thread::spawn(move || {
                for i in 0..300u32 {
                    cache.add(t * 1000 + i % 50, i);
                    cache.get(&(t * 1000 + (i + 3) % 50));
                    if i % 25 == 0 {
                        clock.advance(Duration::from_millis(200));
                    }
                    assert!(cache.len() <= 32);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    assert!(cache.len() <= 32);
    Ok(())
}

#[test]
fn test_frequency_counts_across_threads() -> Result<()> {
    // Capacity covers every key, so no eviction interferes with the totals.
    let cache = Arc::new(FrequencyCache::new(16)?);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..1000 {
                    cache.inc(&format!("key{}", i % 10));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    let mut totals = HashMap::new();
    cache.for_each(&mut |key, n| {
        totals.insert(key.to_string(), n);
    });

    assert_eq!(totals.len(), 10);
    assert!(totals.values().all(|&n| n == 800));
    Ok(())
}

#[test]
fn test_frequency_keeps_heavy_hitters() -> Result<()> {
    init_tracing();
    let cache = CacheConfig {
        counting_capacity: 4,
        ..CacheConfig::default()
    }
    .build_counting_cache()?;

    for _ in 0..50 {
        cache.inc("hot");
    }
    for _ in 0..20 {
        cache.inc("warm");
    }
    for i in 0..100 {
        cache.inc(&format!("cold{}", i));
    }

    assert_eq!(cache.len(), 4);
    assert_eq!(cache.get("hot"), 50);
    assert_eq!(cache.get("warm"), 20);
    Ok(())
}
