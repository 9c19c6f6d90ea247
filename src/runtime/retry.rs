//! Bounded retry with exponential backoff.
//!
//! Retries only transient failures from the external parsing collaborator.
//! The classification pipeline is deterministic and pure, so it is never
//! retried on its own account.

use std::thread;
use std::time::Duration;

use crate::config::Config;
use crate::error::Result;

/// Retry policy: fixed attempt count with exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
    backoff: f64,
}

impl RetryPolicy {
    /// Create a policy.
    pub fn new(attempts: u32, delay: Duration, backoff: f64) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
            backoff,
        }
    }

    /// Build the policy configured for an engine.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.retry_attempts, config.retry_delay, config.retry_backoff)
    }

    /// Total attempt budget.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Run an operation, retrying transient errors up to the attempt
    /// budget. Non-transient errors propagate immediately.
    pub fn run<T>(&self, mut op: impl FnMut() -> Result<T>) -> Result<T> {
        let mut wait = self.delay;

        for attempt in 1..=self.attempts {
            match op() {
                Ok(value) => {
                    if attempt > 1 {
                        log::info!("Retry succeeded on attempt {attempt}");
                    }
                    return Ok(value);
                }
                Err(e) if e.is_transient() && attempt < self.attempts => {
                    log::warn!(
                        "Attempt {attempt}/{} failed: {e}. Retrying in {wait:?}",
                        self.attempts
                    );
                    thread::sleep(wait);
                    wait = wait.mul_f64(self.backoff);
                }
                Err(e) => return Err(e),
            }
        }

        unreachable!("retry loop always returns")
    }
}
