//! Tiered resolution: cache, then durable store, then a fresh simulation.
//!
//! A concrete roll is always evaluated per request; only the distribution
//! summary travels through the tiers. Any non-cache answer schedules
//! fire-and-forget writes into the faster tiers, each bounded by its own
//! timeout and never coupled to the request.

use serde::{Serialize, Serializer};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use strum::Display;
use tracing::{debug, info, warn};

use crate::{
    analyzer::parse,
    ast::Expression,
    codec::decode_expression,
    config::DiceConfig,
    error::DiceResult,
    eval::Evaluator,
    statistics::{MonteCarloEngine, StatisticsResult},
    storage::{CacheEntry, InMemoryCache, InMemoryStore, ResultCache, ResultStore, StorageResult},
    timing::format_duration,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResultSource {
    Cache,
    Store,
    FreshCalculation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedResult {
    pub expression: String,
    #[serde(skip)]
    pub parsed: Expression,
    #[serde(rename = "result")]
    pub value: i64,
    pub breakdown: Vec<i64>,
    pub statistics: StatisticsResult,
    pub source: ResultSource,
    #[serde(rename = "requestDuration", serialize_with = "serialize_elapsed")]
    pub elapsed: Duration,
}

fn serialize_elapsed<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_duration(*elapsed))
}

pub struct Resolver {
    cache: Arc<dyn ResultCache>,
    store: Arc<dyn ResultStore>,
    engine: MonteCarloEngine,
    evaluator: Evaluator,
    iterations: usize,
    cache_write_timeout: Duration,
    store_write_timeout: Duration,
    simulations: AtomicUsize,
}

impl Resolver {
    pub fn new(
        cache: Arc<dyn ResultCache>,
        store: Arc<dyn ResultStore>,
        config: &DiceConfig,
    ) -> Self {
        Self {
            cache,
            store,
            engine: MonteCarloEngine::new(&config.simulation),
            evaluator: Evaluator::new(),
            iterations: config.simulation.iterations,
            cache_write_timeout: config.cache.write_timeout,
            store_write_timeout: config.store.write_timeout,
            simulations: AtomicUsize::new(0),
        }
    }

    /// Resolver backed by process-local tiers.
    pub fn in_memory(config: &DiceConfig) -> Self {
        Self::new(
            Arc::new(InMemoryCache::new(&config.cache)),
            Arc::new(InMemoryStore::new()),
            config,
        )
    }

    /// Number of fresh simulations this resolver has run.
    pub fn simulations_run(&self) -> usize {
        self.simulations.load(Ordering::Relaxed)
    }

    pub async fn resolve_encoded(&self, encoded: &str) -> DiceResult<ResolvedResult> {
        let expression = decode_expression(encoded)?;
        self.resolve(&expression).await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn resolve(&self, expression: &str) -> DiceResult<ResolvedResult> {
        let started = Instant::now();
        let parsed = parse(expression)?;
        let outcome = self.evaluator.evaluate(&parsed)?;

        let (statistics, source) = match self.lookup_cache(expression).await {
            Some(entry) => (entry.statistics, ResultSource::Cache),
            None => match self.lookup_store(expression).await {
                Some(entry) => {
                    self.backfill_cache(expression, entry.clone());
                    (entry.statistics, ResultSource::Store)
                }
                None => {
                    let statistics = self.calculate(parsed).await?;
                    let entry = CacheEntry::from(statistics.clone());
                    self.backfill_cache(expression, entry.clone());
                    self.backfill_store(expression, entry);
                    (statistics, ResultSource::FreshCalculation)
                }
            },
        };

        let elapsed = started.elapsed();
        info!(%source, duration = %format_duration(elapsed), "resolved expression");
        Ok(ResolvedResult {
            expression: expression.to_string(),
            parsed,
            value: outcome.value,
            breakdown: outcome.breakdown,
            statistics,
            source,
            elapsed,
        })
    }

    async fn lookup_cache(&self, key: &str) -> Option<CacheEntry> {
        match self.cache.get(key).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key, error = %e, "cache read failed, treating as miss");
                None
            }
        }
    }

    async fn lookup_store(&self, key: &str) -> Option<CacheEntry> {
        match self.store.get(key).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key, error = %e, "store read failed, treating as miss");
                None
            }
        }
    }

    async fn calculate(&self, parsed: Expression) -> DiceResult<StatisticsResult> {
        self.simulations.fetch_add(1, Ordering::Relaxed);
        let evaluator = self.evaluator;
        // parsed was evaluated once already, so sampling cannot fail
        let sample_fn = move || {
            evaluator
                .roll_total(&parsed, &mut rand::thread_rng())
                .unwrap_or_default()
        };
        let report = self.engine.simulate_report(sample_fn, self.iterations).await?;
        debug!(
            collected = report.collected,
            requested = report.requested,
            "fresh statistics calculated"
        );
        Ok(report.statistics)
    }

    fn backfill_cache(&self, key: &str, entry: CacheEntry) {
        let cache = Arc::clone(&self.cache);
        let owned = key.to_string();
        spawn_backfill("cache", key, self.cache_write_timeout, async move {
            cache.set(&owned, entry).await
        });
    }

    fn backfill_store(&self, key: &str, entry: CacheEntry) {
        let store = Arc::clone(&self.store);
        let owned = key.to_string();
        spawn_backfill("store", key, self.store_write_timeout, async move {
            store.set(&owned, entry).await
        });
    }
}

fn spawn_backfill<F>(tier: &'static str, key: &str, timeout: Duration, write: F)
where
    F: Future<Output = StorageResult<()>> + Send + 'static,
{
    let key = key.to_string();
    tokio::spawn(async move {
        match tokio::time::timeout(timeout, write).await {
            Ok(Ok(())) => debug!(tier, key = %key, "backfill complete"),
            Ok(Err(e)) => warn!(tier, key = %key, error = %e, "backfill failed"),
            Err(_) => warn!(tier, key = %key, ?timeout, "backfill timed out"),
        }
    });
}
