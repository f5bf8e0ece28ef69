//! Optional retry with exponential backoff for external CLI calls.
//!
//! Off unless the config file carries a `[retry]` section; the default is
//! one attempt per call.

use crate::config::RetryConfig;
use crate::error::StageError;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Base delay for backoff.
    pub base_delay: Duration,
    /// Upper bound on backoff delay.
    pub max_delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    NoRetry,
    RetryAfter(Duration),
}

impl RetryPolicy {
    /// One attempt, no backoff.
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    pub fn from_config(cfg: Option<&RetryConfig>) -> Self {
        match cfg {
            None => Self::single_attempt(),
            Some(c) => Self {
                max_attempts: c.max_attempts.max(1),
                base_delay: Duration::from_secs_f64(c.base_delay_secs.max(0.0)),
                max_delay: Duration::from_secs(c.max_delay_secs),
            },
        }
    }

    /// Decide what to do after a failed attempt. `attempt` is 1-based.
    /// Transient transfer failures back off as base * 2^(attempt-1), capped
    /// at `max_delay`; everything else stops immediately.
    pub fn decide(&self, attempt: u32, err: &StageError) -> RetryDecision {
        if attempt >= self.max_attempts || !err.is_transient() {
            return RetryDecision::NoRetry;
        }
        let exp = 1u32 << attempt.saturating_sub(1).min(8);
        let delay = self.base_delay.saturating_mul(exp).min(self.max_delay);
        RetryDecision::RetryAfter(delay)
    }
}

/// Runs a closure until it succeeds or the policy says stop.
/// On a retryable failure, sleeps for the backoff duration then tries again.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, StageError>
where
    F: FnMut() -> Result<T, StageError>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(err) => match policy.decide(attempt, &err) {
                RetryDecision::NoRetry => return Err(err),
                RetryDecision::RetryAfter(delay) => {
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "retrying after transient failure: {}",
                        err
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
            },
        }
    }
}
