//! Batch execution over a bounded worker pool.
//!
//! Documents are independent: one per worker, no shared mutable state
//! beyond the read-only config and the batch circuit breaker. A failing
//! document never corrupts or halts its siblings.

use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::source::FragmentSource;

use super::breaker::CircuitBreaker;
use super::{DocumentResult, DocumentStatus, Engine};

/// Aggregate counts for one batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Number of documents submitted.
    pub total: usize,
    /// Documents that produced an outline.
    pub succeeded: usize,
    /// Documents that were attempted and failed.
    pub failed: usize,
    /// Documents skipped without attempt.
    pub skipped: usize,
    /// succeeded / total, in percent.
    pub success_rate: f64,
    /// Wall-clock batch duration.
    pub duration: Duration,
}

/// Results and summary of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Per-document result records, in submission order.
    pub results: Vec<DocumentResult>,
    /// Aggregate counts.
    pub summary: BatchSummary,
}

impl BatchReport {
    /// Whether every attempted document succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.summary.failed == 0
    }
}

/// Runs a set of documents through an [`Engine`] on a bounded pool.
pub struct BatchRunner {
    engine: Engine,
    pool: ThreadPool,
}

impl BatchRunner {
    /// Create a runner with a validated configuration.
    ///
    /// `config.workers` bounds the pool; zero means one worker per core.
    pub fn new(config: Config) -> Result<Self> {
        let workers = config.workers;
        let engine = Engine::new(config)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("outliner-batch-{i}"))
            .build()
            .map_err(|e| Error::InvalidConfig(format!("worker pool: {e}")))?;
        Ok(Self { engine, pool })
    }

    /// The underlying engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Process every source, one document per worker.
    ///
    /// A fresh circuit breaker guards the batch: past the configured number
    /// of consecutive failures, remaining documents are skipped without
    /// attempt. Results keep submission order.
    pub fn run(&self, sources: &[Box<dyn FragmentSource>]) -> BatchReport {
        let started = Instant::now();
        let breaker = CircuitBreaker::new(self.engine.config().breaker_threshold);

        let results: Vec<DocumentResult> = self.pool.install(|| {
            sources
                .par_iter()
                .map(|source| {
                    if let Err(e) = breaker.check() {
                        return DocumentResult::from_error(
                            source.name().to_string(),
                            e,
                            Duration::ZERO,
                        );
                    }

                    let result = self.engine.process(source.as_ref());
                    match result.status {
                        DocumentStatus::Succeeded { .. } => breaker.record_success(),
                        DocumentStatus::Failed { .. } => breaker.record_failure(),
                        // Skips carry no signal about input health.
                        DocumentStatus::Skipped { .. } => {}
                    }
                    result
                })
                .collect()
        });

        let mut summary = BatchSummary {
            total: results.len(),
            duration: started.elapsed(),
            ..Default::default()
        };
        for result in &results {
            match result.status {
                DocumentStatus::Succeeded { .. } => summary.succeeded += 1,
                DocumentStatus::Failed { .. } => summary.failed += 1,
                DocumentStatus::Skipped { .. } => summary.skipped += 1,
            }
        }
        if summary.total > 0 {
            summary.success_rate = summary.succeeded as f64 / summary.total as f64 * 100.0;
        }

        log::info!(
            "Batch complete: {}/{} succeeded, {} failed, {} skipped in {:?}",
            summary.succeeded,
            summary.total,
            summary.failed,
            summary.skipped,
            summary.duration
        );

        BatchReport { results, summary }
    }
}
