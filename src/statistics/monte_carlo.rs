//! Parallel sampling driver.
//!
//! A fixed pool of blocking workers repeatedly invokes the sample function
//! and pushes each result into a bounded channel. A single collector drains
//! the channel until the requested number of samples has arrived or the
//! deadline fires, then aggregates whatever it collected.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use thiserror::Error;
use tokio::{sync::mpsc, time::Instant};
use tracing::{debug, trace, warn};

use crate::config::SimulationConfig;

use super::aggregate::{aggregate, StatisticsResult};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Simulation timed out after {timeout:?} without collecting a sample")]
    Timeout { timeout: Duration },
    #[error("Simulation workers stopped before producing a sample")]
    WorkersExited,
    #[error("Simulation requires at least one iteration")]
    NoIterations,
}

pub type SimulationResult<T> = Result<T, SimulationError>;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub statistics: StatisticsResult,
    pub requested: usize,
    pub collected: usize,
    pub elapsed: Duration,
}

impl SimulationReport {
    pub fn is_complete(&self) -> bool {
        self.collected == self.requested
    }
}

// Sets the shared flag when dropped, so workers stop even if the caller
// abandons the simulation future.
struct CancelGuard {
    cancelled: Arc<AtomicBool>,
}

impl CancelGuard {
    fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

#[derive(Debug, Clone)]
pub struct MonteCarloEngine {
    workers: usize,
    timeout: Duration,
    channel_capacity: usize,
}

impl Default for MonteCarloEngine {
    fn default() -> Self {
        Self::new(&SimulationConfig::default())
    }
}

impl MonteCarloEngine {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            workers: config.worker_count(),
            timeout: config.timeout,
            channel_capacity: config.channel_capacity.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Samples `iterations` times within the configured timeout.
    pub async fn simulate<F>(&self, sample_fn: F, iterations: usize) -> SimulationResult<StatisticsResult>
    where
        F: Fn() -> i64 + Send + Sync + 'static,
    {
        self.simulate_report(sample_fn, iterations)
            .await
            .map(|report| report.statistics)
    }

    pub async fn simulate_report<F>(&self, sample_fn: F, iterations: usize) -> SimulationResult<SimulationReport>
    where
        F: Fn() -> i64 + Send + Sync + 'static,
    {
        let deadline = Instant::now() + self.timeout;
        self.simulate_until(sample_fn, iterations, deadline).await
    }

    #[tracing::instrument(level = "debug", skip(self, sample_fn))]
    pub async fn simulate_until<F>(
        &self,
        sample_fn: F,
        iterations: usize,
        deadline: Instant,
    ) -> SimulationResult<SimulationReport>
    where
        F: Fn() -> i64 + Send + Sync + 'static,
    {
        if iterations == 0 {
            return Err(SimulationError::NoIterations);
        }

        let started = Instant::now();
        let sample_fn = Arc::new(sample_fn);
        let capacity = iterations.min(self.channel_capacity);
        let (tx, mut rx) = mpsc::channel::<i64>(capacity);
        let guard = CancelGuard::new();
        let claimed = Arc::new(AtomicUsize::new(0));

        for worker in 0..self.workers {
            let tx = tx.clone();
            let sample_fn = Arc::clone(&sample_fn);
            let cancelled = guard.flag();
            let claimed = Arc::clone(&claimed);
            tokio::task::spawn_blocking(move || {
                let mut produced = 0usize;
                while !cancelled.load(Ordering::Acquire) {
                    if claimed.fetch_add(1, Ordering::Relaxed) >= iterations {
                        break;
                    }
                    // receiver gone means the collector is finished
                    if tx.blocking_send(sample_fn()).is_err() {
                        break;
                    }
                    produced += 1;
                }
                trace!(worker, produced, "monte carlo worker finished");
            });
        }
        drop(tx);

        let mut samples = Vec::with_capacity(capacity);
        let mut timed_out = false;
        let sleep = tokio::time::sleep_until(deadline);
        tokio::pin!(sleep);

        while samples.len() < iterations {
            let remaining = iterations - samples.len();
            tokio::select! {
                biased;
                _ = &mut sleep => {
                    timed_out = true;
                    break;
                }
                received = rx.recv_many(&mut samples, remaining) => {
                    if received == 0 {
                        break;
                    }
                }
            }
        }
        drop(guard);
        drop(rx);

        let elapsed = started.elapsed();
        let collected = samples.len();
        if collected == 0 {
            return Err(if timed_out {
                SimulationError::Timeout {
                    timeout: deadline.saturating_duration_since(started),
                }
            } else {
                SimulationError::WorkersExited
            });
        }
        if collected < iterations {
            warn!(
                collected,
                requested = iterations,
                timed_out,
                "simulation ended early, aggregating partial sample"
            );
        } else {
            debug!(collected, ?elapsed, "simulation complete");
        }

        let statistics = aggregate(&samples).ok_or(SimulationError::WorkersExited)?;
        Ok(SimulationReport {
            statistics,
            requested: iterations,
            collected,
            elapsed,
        })
    }
}
