//! Process-local durable tier.
//!
//! Entries live in a [`DashMap`] and are never evicted, mirroring a table
//! upserted by expression key.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::trace;

use super::{CacheEntry, ResultStore, StorageResult};

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<DashMap<String, CacheEntry>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

#[async_trait]
impl ResultStore for InMemoryStore {
    async fn get(&self, key: &str) -> StorageResult<Option<CacheEntry>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, entry: CacheEntry) -> StorageResult<()> {
        trace!(key, "store upsert");
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }
}
