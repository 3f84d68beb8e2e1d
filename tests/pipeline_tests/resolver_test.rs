use std::sync::Arc;
use std::time::Duration;

use dicestat::{
    codec::encode_expression,
    storage::{CacheEntry, InMemoryCache, InMemoryStore, ResultCache, ResultStore},
    Error, Resolver, ResultSource,
};
use pretty_assertions::assert_eq;

use super::test_config;

// backfills are fire-and-forget, so poll until they land
async fn eventually_cached(cache: &InMemoryCache, key: &str) -> Option<CacheEntry> {
    for _ in 0..50 {
        if let Some(entry) = cache.get(key).await.unwrap() {
            return Some(entry);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    None
}

#[tokio::test]
async fn it_walks_the_tiers_in_order() {
    let config = test_config(5_000);
    let cache = Arc::new(InMemoryCache::new(&config.cache));
    let store = Arc::new(InMemoryStore::new());
    let resolver = Resolver::new(cache.clone(), store.clone(), &config);

    let first = resolver.resolve("3d6").await.unwrap();
    assert_eq!(first.source, ResultSource::FreshCalculation);
    assert_eq!(first.statistics.min, 3);
    assert_eq!(first.statistics.max, 18);

    let cached = eventually_cached(&cache, "3d6").await.unwrap();
    assert_eq!(cached.statistics, first.statistics);

    let second = resolver.resolve("3d6").await.unwrap();
    assert_eq!(second.source, ResultSource::Cache);
    assert_eq!(second.statistics, first.statistics);
    assert_eq!(resolver.simulations_run(), 1);
}

#[tokio::test]
async fn it_serves_store_hits_and_repopulates_cache() {
    let config = test_config(1_000);
    let cache = Arc::new(InMemoryCache::new(&config.cache));
    let store = Arc::new(InMemoryStore::new());
    let stored = CacheEntry::from(dicestat::aggregate(&[1, 50, 100]).unwrap());
    store.set("d%", stored.clone()).await.unwrap();

    let resolver = Resolver::new(cache.clone(), store.clone(), &config);
    let resolved = resolver.resolve("d%").await.unwrap();

    assert_eq!(resolved.source, ResultSource::Store);
    assert_eq!(resolved.statistics, stored.statistics);
    assert_eq!(resolver.simulations_run(), 0);
    assert_eq!(eventually_cached(&cache, "d%").await, Some(stored));
}

#[tokio::test]
async fn it_keys_by_raw_expression_text() {
    let config = test_config(1_000);
    let resolver = Resolver::in_memory(&config);

    resolver.resolve("2d6").await.unwrap();
    let spaced = resolver.resolve("2 d 6").await.unwrap();

    assert_eq!(spaced.source, ResultSource::FreshCalculation);
    assert_eq!(resolver.simulations_run(), 2);
}

#[tokio::test]
async fn it_resolves_encoded_expressions() {
    let resolver = Resolver::in_memory(&test_config(1_000));
    let resolved = resolver
        .resolve_encoded(&encode_expression("d%"))
        .await
        .unwrap();
    assert_eq!(resolved.expression, "d%");
    assert!((1..=100).contains(&resolved.value));

    let err = resolver.resolve_encoded("%%%").await.unwrap_err();
    assert!(matches!(err, Error::Codec(_)));
}

#[tokio::test]
async fn it_surfaces_client_faults() {
    let resolver = Resolver::in_memory(&test_config(1_000));
    for input in ["3.14", "abc", "d0"] {
        let err = resolver.resolve(input).await.unwrap_err();
        assert!(err.is_client_fault(), "{input:?} gave {err}");
    }
    assert_eq!(resolver.simulations_run(), 0);
}
