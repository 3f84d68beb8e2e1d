//! Side-store seams for previously computed statistics.
//!
//! Two tiers sit in front of the simulation engine:
//!
//! - [`ResultCache`]: a fast, bounded tier with recency-based eviction and a TTL.
//! - [`ResultStore`]: a durable tier that upserts by key and never evicts.
//!
//! Both are keyed by the raw expression string and hold a [`CacheEntry`].
//! Their failures are reported as [`StorageError`] and are never fatal to a
//! request; the resolver treats a failed read as a miss and only logs a
//! failed write.
//!
//! # Usage Example
//!
//! ```no_run
//! use dicestat::storage::{InMemoryCache, ResultCache};
//! use dicestat::config::CacheConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = InMemoryCache::new(&CacheConfig::default());
//! if let Some(entry) = cache.get("3d6").await? {
//!     println!("mean of 3d6 is {}", entry.statistics.mean);
//! }
//! # Ok(())
//! # }
//! ```

pub mod in_memory_cache;
pub mod in_memory_store;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::statistics::StatisticsResult;

pub use in_memory_cache::InMemoryCache;
pub use in_memory_store::InMemoryStore;

/// Tier-resident projection of a resolved expression.
///
/// Only the distribution summary is persisted; a concrete roll is cheap and
/// recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub statistics: StatisticsResult,
}

impl From<StatisticsResult> for CacheEntry {
    fn from(statistics: StatisticsResult) -> Self {
        Self { statistics }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Backend(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Fast tier consulted first on every request.
///
/// # Thread Safety
///
/// Implementations are shared across concurrent requests and background
/// backfill tasks. A `set` must keep the tier within its size bound even
/// when racing other writers.
#[automock]
#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Look up statistics for `key`, marking it as most recently used.
    ///
    /// # Returns
    /// * `Ok(Some(entry))` - On a live hit
    /// * `Ok(None)` - On a miss or an expired entry
    /// * `Err(StorageError)` - If the tier could not be read
    ///
    /// A hit re-promotes the key but does not refresh its TTL: an entry
    /// expires a fixed time after its last `set`, however often it is read.
    /// Expiry is lazy, so an expired key keeps its recency slot until a read
    /// drops it, a write replaces it, or eviction trims it.
    async fn get(&self, key: &str) -> StorageResult<Option<CacheEntry>>;

    /// Store `entry` under `key` as the most recently used key, evicting the
    /// least recently used keys beyond the configured bound.
    async fn set(&self, key: &str, entry: CacheEntry) -> StorageResult<()>;
}

/// Durable tier consulted on a cache miss.
#[automock]
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn get(&self, key: &str) -> StorageResult<Option<CacheEntry>>;

    /// Insert or replace the entry for `key`.
    async fn set(&self, key: &str, entry: CacheEntry) -> StorageResult<()>;
}
