//! Engine configuration.
//!
//! A [`Config`] is built once, validated, and then shared read-only by every
//! worker in a batch. It is never mutated mid-run; per-invocation overrides
//! are expressed by constructing a new value with the builder methods.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Weights for the heading-likelihood factors.
///
/// Weights must sum to exactly 1.0; [`Config::validate`] rejects anything
/// else at load time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorWeights {
    /// Font size percentile relative to body text.
    pub size: f32,
    /// Bold/italic flags and non-body font family.
    pub typography: f32,
    /// Vertical placement and whitespace gap above.
    pub position: f32,
    /// Lexical cues: numbering, title case, terminal punctuation.
    pub pattern: f32,
    /// Isolation from surrounding body text.
    pub context: f32,
    /// Inverse word count.
    pub length: f32,
}

impl FactorWeights {
    /// Sum of all weights.
    pub fn sum(&self) -> f32 {
        self.size + self.typography + self.position + self.pattern + self.context + self.length
    }
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            size: 0.25,
            typography: 0.25,
            position: 0.20,
            pattern: 0.15,
            context: 0.10,
            length: 0.05,
        }
    }
}

/// Configuration for the heading classification engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Factor weights for the composite score.
    pub weights: FactorWeights,

    /// Percentile (0-100) of the document's own candidate score
    /// distribution below which candidates are dropped as body text.
    pub score_threshold_percentile: u8,

    /// Fraction of pages on which a normalized text may recur at the same
    /// relative vertical position before it is rejected as page furniture.
    pub furniture_page_fraction: f32,

    /// Maximum character length for a heading candidate.
    pub max_heading_chars: usize,

    /// Number of leading pages scanned for the title when the first page
    /// is sparse.
    pub title_page_window: u32,

    /// Maximum input size in MB; larger sources are skipped before parsing.
    pub max_file_size_mb: u32,

    /// Maximum number of fragments processed per document; excess is
    /// truncated with a warning.
    pub max_fragments: usize,

    /// Maximum number of headings emitted per document.
    pub max_headings: usize,

    /// Per-document wall-clock deadline.
    pub timeout: Duration,

    /// Maximum parse attempts for transient parser failures.
    pub retry_attempts: u32,

    /// Initial delay between retry attempts.
    pub retry_delay: Duration,

    /// Exponential backoff multiplier applied to the retry delay.
    pub retry_backoff: f64,

    /// Consecutive document failures before the batch circuit opens.
    pub breaker_threshold: u32,

    /// Worker pool size for batch processing (0 = one per CPU core).
    pub workers: usize,
}

impl Config {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the factor weights.
    pub fn with_weights(mut self, weights: FactorWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the candidate score threshold percentile.
    pub fn with_score_threshold(mut self, percentile: u8) -> Self {
        self.score_threshold_percentile = percentile;
        self
    }

    /// Set the page-furniture recurrence fraction.
    pub fn with_furniture_fraction(mut self, fraction: f32) -> Self {
        self.furniture_page_fraction = fraction;
        self
    }

    /// Set the input size ceiling in MB.
    pub fn with_max_file_size_mb(mut self, mb: u32) -> Self {
        self.max_file_size_mb = mb;
        self
    }

    /// Set the per-document fragment ceiling.
    pub fn with_max_fragments(mut self, max: usize) -> Self {
        self.max_fragments = max;
        self
    }

    /// Set the maximum number of headings emitted per document.
    pub fn with_max_headings(mut self, max: usize) -> Self {
        self.max_headings = max;
        self
    }

    /// Set the per-document timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy parameters.
    pub fn with_retry(mut self, attempts: u32, delay: Duration, backoff: f64) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay = delay;
        self.retry_backoff = backoff;
        self
    }

    /// Set the circuit breaker failure threshold.
    pub fn with_breaker_threshold(mut self, threshold: u32) -> Self {
        self.breaker_threshold = threshold;
        self
    }

    /// Set the batch worker pool size.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Validate the configuration.
    ///
    /// Returns [`Error::InvalidConfig`] for weights that do not sum to 1.0,
    /// zero ceilings, or a zero attempt budget.
    pub fn validate(&self) -> Result<()> {
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(Error::InvalidConfig(format!(
                "factor weights must sum to 1.0, got {sum}"
            )));
        }
        if self.score_threshold_percentile > 100 {
            return Err(Error::InvalidConfig(
                "score threshold percentile must be within 0-100".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.furniture_page_fraction) {
            return Err(Error::InvalidConfig(
                "furniture page fraction must be within 0.0-1.0".into(),
            ));
        }
        if self.max_heading_chars == 0 {
            return Err(Error::InvalidConfig(
                "max heading length must be positive".into(),
            ));
        }
        if self.max_file_size_mb == 0 {
            return Err(Error::InvalidConfig("max file size must be positive".into()));
        }
        if self.max_fragments == 0 || self.max_headings == 0 {
            return Err(Error::InvalidConfig(
                "resource ceilings must be positive".into(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(Error::InvalidConfig("timeout must be positive".into()));
        }
        if self.retry_attempts == 0 {
            return Err(Error::InvalidConfig(
                "retry attempts must be at least 1".into(),
            ));
        }
        if self.retry_backoff < 1.0 {
            return Err(Error::InvalidConfig(
                "retry backoff must be at least 1.0".into(),
            ));
        }
        if self.breaker_threshold == 0 {
            return Err(Error::InvalidConfig(
                "breaker threshold must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weights: FactorWeights::default(),
            score_threshold_percentile: 25,
            furniture_page_fraction: 0.4,
            max_heading_chars: 200,
            title_page_window: 2,
            max_file_size_mb: 100,
            max_fragments: 10_000,
            max_headings: 50,
            timeout: Duration::from_secs(300),
            retry_attempts: 3,
            retry_delay: Duration::from_secs(1),
            retry_backoff: 2.0,
            breaker_threshold: 5,
            workers: 0,
        }
    }
}
