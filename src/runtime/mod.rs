//! Per-document resilience wrapper and result records.
//!
//! The classification pipeline itself is pure; everything that can go wrong
//! lives here: retryable parser failures, per-document deadlines, resource
//! ceilings, and the batch circuit breaker. Every document, failed or not,
//! yields a [`DocumentResult`] so batch reporting is complete.

mod batch;
mod breaker;
mod retry;

pub use batch::{BatchReport, BatchRunner, BatchSummary};
pub use breaker::CircuitBreaker;
pub use retry::RetryPolicy;

use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::classify_with_warnings;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{FragmentStream, Outline};
use crate::source::FragmentSource;

/// Outcome of one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    /// The pipeline produced an outline.
    Succeeded {
        /// The outline artifact.
        outline: Outline,
    },
    /// Processing was attempted and failed.
    Failed {
        /// Failure reason.
        reason: String,
    },
    /// Processing was not attempted (oversize input, open circuit).
    Skipped {
        /// Skip reason.
        reason: String,
    },
}

/// Result record for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Source name (typically the input file stem).
    pub document: String,

    /// Outcome.
    #[serde(flatten)]
    pub status: DocumentStatus,

    /// Truncation and other non-fatal warnings.
    pub warnings: Vec<String>,

    /// When processing finished.
    pub processed_at: DateTime<Utc>,

    /// Wall-clock processing time.
    pub duration: Duration,
}

impl DocumentResult {
    fn succeeded(
        document: String,
        outline: Outline,
        warnings: Vec<String>,
        duration: Duration,
    ) -> Self {
        Self {
            document,
            status: DocumentStatus::Succeeded { outline },
            warnings,
            processed_at: Utc::now(),
            duration,
        }
    }

    fn from_error(document: String, error: Error, duration: Duration) -> Self {
        let status = match &error {
            Error::OversizeInput { .. } | Error::CircuitOpen => DocumentStatus::Skipped {
                reason: error.to_string(),
            },
            _ => DocumentStatus::Failed {
                reason: error.to_string(),
            },
        };
        Self {
            document,
            status,
            warnings: Vec::new(),
            processed_at: Utc::now(),
            duration,
        }
    }

    /// Whether the document produced an outline.
    pub fn is_success(&self) -> bool {
        matches!(self.status, DocumentStatus::Succeeded { .. })
    }

    /// The outline, when processing succeeded.
    pub fn outline(&self) -> Option<&Outline> {
        match &self.status {
            DocumentStatus::Succeeded { outline } => Some(outline),
            _ => None,
        }
    }

    /// The failure or skip reason, when there is one.
    pub fn reason(&self) -> Option<&str> {
        match &self.status {
            DocumentStatus::Succeeded { .. } => None,
            DocumentStatus::Failed { reason } | DocumentStatus::Skipped { reason } => {
                Some(reason)
            }
        }
    }
}

/// Run a computation on a worker thread with a wall-clock deadline.
///
/// On timeout the worker is abandoned (it cannot be cancelled) and
/// [`Error::Timeout`] is returned; the pure pipeline holds no locks or
/// shared state, so an abandoned worker affects nothing else.
pub(crate) fn run_with_timeout<T: Send + 'static>(
    timeout: Duration,
    f: impl FnOnce() -> T + Send + 'static,
) -> Result<T> {
    let (tx, rx) = crossbeam_channel::bounded(1);
    thread::Builder::new()
        .name("outliner-worker".into())
        .spawn(move || {
            let _ = tx.send(f());
        })?;

    rx.recv_timeout(timeout).map_err(|_| Error::Timeout(timeout))
}

/// The per-document engine: resilience policies around the pure pipeline.
#[derive(Debug, Clone)]
pub struct Engine {
    config: Config,
}

impl Engine {
    /// Create an engine with a validated configuration.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create an engine with the default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Process one document from a fragment source.
    ///
    /// Transient parser failures are retried per the configured policy;
    /// classification runs under the per-document deadline. Never panics
    /// and never returns early; every path produces a result record.
    pub fn process(&self, source: &dyn FragmentSource) -> DocumentResult {
        let started = Instant::now();
        let name = source.name().to_string();

        let policy = RetryPolicy::from_config(&self.config);
        let stream = match policy.run(|| source.fragments()) {
            Ok(stream) => stream,
            Err(e) => {
                log::error!("{name}: input acquisition failed: {e}");
                return DocumentResult::from_error(name, e, started.elapsed());
            }
        };

        self.process_stream(name, stream, started)
    }

    /// Process a fragment stream already in memory (no parse, no retry).
    pub fn process_fragments(&self, name: impl Into<String>, stream: FragmentStream) -> DocumentResult {
        self.process_stream(name.into(), stream, Instant::now())
    }

    fn process_stream(
        &self,
        name: String,
        stream: FragmentStream,
        started: Instant,
    ) -> DocumentResult {
        let config = self.config.clone();
        let outcome = run_with_timeout(self.config.timeout, move || {
            classify_with_warnings(&stream, &config)
        });

        match outcome {
            Ok((outline, warnings)) => {
                log::info!(
                    "{name}: {} headings, title {:?} ({:?})",
                    outline.heading_count(),
                    outline.title,
                    started.elapsed()
                );
                DocumentResult::succeeded(name, outline, warnings, started.elapsed())
            }
            Err(e) => {
                log::error!("{name}: {e}");
                DocumentResult::from_error(name, e, started.elapsed())
            }
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
