//! Retry logic.
//!
//! # Responsibilities
//! - Decide whether a failure is transient (`Transient` trait)
//! - Re-invoke the operation with exponential backoff
//! - Hand the last failure back unchanged once the attempt budget is spent
//!
//! # Design Decisions
//! - Only transient failures are retried; everything else returns at once
//! - No jitter, no circuit breaker, no per-call timeout (the driver owns
//!   connection and server-selection timeouts)

use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::observability::metrics;
use crate::resilience::backoff::{calculate_backoff, scale};

/// Errors that know whether retrying could help.
pub trait Transient {
    /// True for connectivity and server-selection failures.
    fn is_transient(&self) -> bool;
}

/// Attempt budget and backoff schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total invocations allowed, including the first. Zero behaves as one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            backoff: 2.0,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_millis(config.base_delay_ms),
            backoff: config.backoff,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    fn attempt_budget(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// The sleeps taken between attempts when every attempt fails transiently.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (1..self.attempt_budget()).map(|retry| calculate_backoff(retry, self.base_delay, self.backoff))
    }
}

/// Run `call` until it succeeds, fails permanently, or the budget runs out.
///
/// `operation` labels log lines and the retry counter.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, operation: &str, mut call: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Transient + fmt::Display,
{
    let budget = policy.attempt_budget();
    let mut delay = policy.base_delay;
    let mut attempts = 0u32;

    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() => {
                attempts += 1;
                if attempts >= budget {
                    tracing::warn!(
                        operation,
                        attempts,
                        error = %err,
                        "Transient failure, retry budget exhausted"
                    );
                    return Err(err);
                }

                tracing::warn!(
                    operation,
                    attempt = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Transient failure, retrying"
                );
                metrics::record_retry(operation);

                tokio::time::sleep(delay).await;
                delay = scale(delay, policy.backoff);
            }
            Err(err) => return Err(err),
        }
    }
}
