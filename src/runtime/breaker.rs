//! Circuit breaker over consecutive document failures.
//!
//! Past the failure threshold the circuit opens and remaining documents in
//! the batch are short-circuited to "skipped" instead of burning time on a
//! systemically broken input set. An optional cooldown lets a long-lived
//! engine probe again (half-open) after a quiet period.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug)]
struct Inner {
    state: State,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
}

/// Circuit breaker shared by all workers of a batch.
#[derive(Debug)]
pub struct CircuitBreaker {
    threshold: u32,
    cooldown: Option<Duration>,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    /// Create a breaker that opens after `threshold` consecutive failures
    /// and stays open for the remainder of the batch.
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            cooldown: None,
            inner: Mutex::new(Inner {
                state: State::Closed,
                consecutive_failures: 0,
                opened_at: None,
            }),
        }
    }

    /// Allow a half-open probe after the given quiet period.
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = Some(cooldown);
        self
    }

    /// Check whether an operation may proceed.
    ///
    /// Returns [`Error::CircuitOpen`] while the circuit is open; in the
    /// half-open state a single caller is let through as a probe.
    pub fn check(&self) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            State::Closed | State::HalfOpen => Ok(()),
            State::Open => {
                let elapsed_cooldown = match (self.cooldown, inner.opened_at) {
                    (Some(cooldown), Some(at)) => at.elapsed() >= cooldown,
                    _ => false,
                };
                if elapsed_cooldown {
                    log::info!("Circuit breaker half-open");
                    inner.state = State::HalfOpen;
                    Ok(())
                } else {
                    Err(Error::CircuitOpen)
                }
            }
        }
    }

    /// Record a successful operation, closing the circuit.
    pub fn record_success(&self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.state == State::HalfOpen {
            log::info!("Circuit breaker closed after successful probe");
        }
        inner.state = State::Closed;
        inner.consecutive_failures = 0;
        inner.opened_at = None;
    }

    /// Record a failed operation, opening the circuit at the threshold.
    pub fn record_failure(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.consecutive_failures += 1;
        if inner.state == State::HalfOpen || inner.consecutive_failures >= self.threshold {
            if inner.state != State::Open {
                log::warn!(
                    "Circuit breaker open after {} consecutive failures",
                    inner.consecutive_failures
                );
            }
            inner.state = State::Open;
            inner.opened_at = Some(Instant::now());
        }
    }

    /// Whether the circuit is currently open.
    pub fn is_open(&self) -> bool {
        self.inner.lock().unwrap().state == State::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opens_at_threshold() {
        let breaker = CircuitBreaker::new(3);
        for _ in 0..2 {
            breaker.record_failure();
            assert!(breaker.check().is_ok());
        }
        breaker.record_failure();
        assert!(breaker.is_open());
        assert!(matches!(breaker.check(), Err(Error::CircuitOpen)));
    }

    #[test]
    fn test_success_resets_count() {
        let breaker = CircuitBreaker::new(2);
        breaker.record_failure();
        breaker.record_success();
        breaker.record_failure();
        assert!(!breaker.is_open());
        assert!(breaker.check().is_ok());
    }

    #[test]
    fn test_stays_open_without_cooldown() {
        let breaker = CircuitBreaker::new(1);
        breaker.record_failure();
        std::thread::sleep(Duration::from_millis(5));
        assert!(matches!(breaker.check(), Err(Error::CircuitOpen)));
    }

    #[test]
    fn test_half_open_probe_recloses() {
        let breaker = CircuitBreaker::new(1).with_cooldown(Duration::from_millis(1));
        breaker.record_failure();
        std::thread::sleep(Duration::from_millis(5));
        assert!(breaker.check().is_ok());
        breaker.record_success();
        assert!(!breaker.is_open());
    }

    #[test]
    fn test_half_open_probe_failure_reopens() {
        let breaker = CircuitBreaker::new(1).with_cooldown(Duration::from_millis(1));
        breaker.record_failure();
        std::thread::sleep(Duration::from_millis(5));
        assert!(breaker.check().is_ok());
        breaker.record_failure();
        assert!(breaker.is_open());
    }
}
