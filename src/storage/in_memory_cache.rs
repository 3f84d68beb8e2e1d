//! Bounded LRU tier with expiry.
//!
//! Entries live in an [`LruCache`] behind one lock, so a write stores the
//! entry, moves its key to the most recent position and evicts the least
//! recently used key in a single critical section. A concurrent writer can
//! never observe a key that was just re-promoted being swept.
//!
//! Expiry is lazy. A read promotes a key but does not extend its TTL, and
//! an expired key keeps its recency slot until it is read, trimmed or
//! overwritten.

use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::config::CacheConfig;

use super::{CacheEntry, ResultCache, StorageResult};

#[derive(Debug)]
struct Slot {
    entry: CacheEntry,
    expires_at: Instant,
}

impl Slot {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryCache {
    max_entries: usize,
    ttl: Duration,
    // iteration order is most to least recently used
    entries: Arc<Mutex<LruCache<String, Slot>>>,
}

impl InMemoryCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_limits(config.max_entries, config.ttl)
    }

    pub fn with_limits(max_entries: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            max_entries: capacity.get(),
            ttl,
            entries: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Number of entries that have not yet expired.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        entries.iter().filter(|(_, slot)| !slot.is_expired(now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Keys from most to least recently used, expired ones included.
    pub async fn keys(&self) -> Vec<String> {
        let entries = self.entries.lock().await;
        entries.iter().map(|(key, _)| key.clone()).collect()
    }
}

#[async_trait]
impl ResultCache for InMemoryCache {
    async fn get(&self, key: &str) -> StorageResult<Option<CacheEntry>> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let expired = match entries.peek(key) {
            None => return Ok(None),
            Some(slot) => slot.is_expired(now),
        };
        if expired {
            trace!(key, "cache entry expired");
            entries.pop(key);
            return Ok(None);
        }
        Ok(entries.get(key).map(|slot| slot.entry.clone()))
    }

    async fn set(&self, key: &str, entry: CacheEntry) -> StorageResult<()> {
        let expires_at = Instant::now() + self.ttl;
        let mut entries = self.entries.lock().await;
        // push hands back the displaced pair: the old value of `key`, or the evicted tail
        if let Some((evicted, _)) = entries.push(key.to_string(), Slot { entry, expires_at }) {
            if evicted != key {
                debug!(key, evicted = %evicted, "cache trimmed to capacity");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::aggregate;
    use pretty_assertions::assert_eq;

    fn entry(value: i64) -> CacheEntry {
        CacheEntry::from(aggregate(&[value]).unwrap())
    }

    fn cache(max_entries: usize) -> InMemoryCache {
        InMemoryCache::with_limits(max_entries, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_get_after_set() {
        let cache = cache(4);
        assert_eq!(cache.get("3d6").await.unwrap(), None);
        cache.set("3d6", entry(3)).await.unwrap();
        assert_eq!(cache.get("3d6").await.unwrap(), Some(entry(3)));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_bounded_to_most_recent_writes() {
        let max_entries = 5;
        let cache = cache(max_entries);
        for i in 0..(max_entries + 3) {
            cache.set(&format!("{}d6", i + 1), entry(i as i64)).await.unwrap();
        }

        assert_eq!(cache.len().await, max_entries);
        for i in 0..3 {
            assert_eq!(cache.get(&format!("{}d6", i + 1)).await.unwrap(), None);
        }
        for i in 3..(max_entries + 3) {
            assert!(cache.get(&format!("{}d6", i + 1)).await.unwrap().is_some());
        }
    }

    #[tokio::test]
    async fn test_read_promotes_key() {
        let cache = cache(3);
        cache.set("a", entry(1)).await.unwrap();
        cache.set("b", entry(2)).await.unwrap();
        cache.set("c", entry(3)).await.unwrap();

        // "a" becomes most recent, so "b" is the one evicted next
        cache.get("a").await.unwrap();
        cache.set("d", entry(4)).await.unwrap();

        assert_eq!(cache.keys().await, vec!["d", "a", "c"]);
        assert_eq!(cache.get("b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rewrite_does_not_duplicate_key() {
        let cache = cache(2);
        cache.set("a", entry(1)).await.unwrap();
        cache.set("b", entry(2)).await.unwrap();
        cache.set("a", entry(10)).await.unwrap();
        cache.set("c", entry(3)).await.unwrap();

        assert_eq!(cache.keys().await, vec!["c", "a"]);
        assert_eq!(cache.get("a").await.unwrap(), Some(entry(10)));
    }

    #[tokio::test]
    async fn test_read_does_not_extend_ttl() {
        let cache = InMemoryCache::with_limits(10, Duration::from_millis(100));
        cache.set("3d6", entry(3)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.get("3d6").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(90)).await;
        assert_eq!(cache.get("3d6").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_key_holds_slot_until_touched() {
        let cache = InMemoryCache::with_limits(2, Duration::from_millis(20));
        cache.set("a", entry(1)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(cache.keys().await, vec!["a"]);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_large_cache_stays_exact() {
        let max_entries = 100_000;
        let cache = cache(max_entries);
        for i in 0..(max_entries + 10) {
            cache.set(&i.to_string(), entry(1)).await.unwrap();
        }
        assert_eq!(cache.max_entries(), max_entries);
        assert_eq!(cache.len().await, max_entries);
        for i in 0..10 {
            assert_eq!(cache.get(&i.to_string()).await.unwrap(), None);
        }
        assert!(cache.get("10").await.unwrap().is_some());
        cache.set("fresh", entry(2)).await.unwrap();
        assert_eq!(cache.get("11").await.unwrap(), None);
        assert!(cache.get("10").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let cache = InMemoryCache::with_limits(10, Duration::from_millis(20));
        cache.set("d%", entry(50)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(cache.len().await, 0);
        assert_eq!(cache.get("d%").await.unwrap(), None);
        assert!(cache.keys().await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_respect_bound() {
        let max_entries = 16;
        let cache = cache(max_entries);
        let mut handles = Vec::new();
        for writer in 0..8 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..50 {
                    let key = format!("{}d{}", writer + 1, i + 1);
                    cache.set(&key, entry(i)).await.unwrap();
                    cache.get(&key).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let keys = cache.keys().await;
        assert_eq!(keys.len(), max_entries);
        assert_eq!(cache.len().await, max_entries);
        for key in keys {
            assert!(cache.get(&key).await.unwrap().is_some());
        }
    }
}
