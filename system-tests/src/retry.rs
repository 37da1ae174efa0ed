// system-tests/src/retry.rs
// ============================================================================
// Module: Retry and Poll Primitives
// Description: Exponential-backoff retry and fixed-interval polling.
// Purpose: Absorb eventual consistency in the deployment under test.
// Dependencies: tokio
// ============================================================================

//! ## Overview
//! [`retry`] re-invokes a fallible async operation with exponential backoff
//! and hands back the last error untouched. [`wait_for`] polls an async
//! predicate at a fixed interval until it holds or a bound elapses. Neither
//! logs nor touches anything besides the supplied callable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio::time::sleep;

use crate::error::HarnessError;

// ============================================================================
// SECTION: Policies
// ============================================================================

/// Attempt budget and base delay for [`retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total invocations, first included. Zero behaves as one.
    pub max_attempts: u32,
    /// Delay after the first failure; doubles after each further failure.
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Backoff after the failure of 0-based attempt `attempt_index`.
    #[must_use]
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        self.initial_delay.saturating_mul(2u32.saturating_pow(attempt_index))
    }

    /// Runs `operation` under this policy.
    ///
    /// # Errors
    ///
    /// Returns the error of the final attempt unmodified.
    pub async fn run<F, Fut, T, E>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt_index = 0u32;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt_index.saturating_add(1) >= attempts {
                        return Err(err);
                    }
                    sleep(self.delay_for(attempt_index)).await;
                    attempt_index = attempt_index.saturating_add(1);
                }
            }
        }
    }
}

/// Bound and interval for [`wait_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Total time allowed for the condition to hold.
    pub timeout: Duration,
    /// Pause between evaluations.
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(10_000),
            interval: Duration::from_millis(1000),
        }
    }
}

impl PollPolicy {
    /// Polls `predicate` under this policy.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Timeout`] converted into `E` when the bound
    /// elapses, or the predicate's own error as soon as it fails.
    pub async fn run<F, Fut, E>(&self, mut predicate: F) -> Result<(), E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool, E>>,
        E: From<HarnessError>,
    {
        let start = Instant::now();
        while start.elapsed() < self.timeout {
            if predicate().await? {
                return Ok(());
            }
            sleep(self.interval).await;
        }
        Err(HarnessError::Timeout {
            timeout: self.timeout,
        }
        .into())
    }
}

// ============================================================================
// SECTION: Operations
// ============================================================================

/// Invokes `operation` up to `max_attempts` times with exponential backoff.
///
/// The wait after failed attempt `i` (0-based) is `initial_delay * 2^i`; no
/// wait follows the final attempt.
///
/// # Errors
///
/// Returns the error of the final attempt unmodified.
pub async fn retry<F, Fut, T, E>(
    operation: F,
    max_attempts: u32,
    initial_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    RetryPolicy {
        max_attempts,
        initial_delay,
    }
    .run(operation)
    .await
}

/// Polls `predicate` every `interval` until it returns true or `timeout` elapses.
///
/// # Errors
///
/// Returns [`HarnessError::Timeout`] naming the bound (converted into `E`),
/// or the predicate's own error as soon as it fails.
pub async fn wait_for<F, Fut, E>(
    predicate: F,
    timeout: Duration,
    interval: Duration,
) -> Result<(), E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
    E: From<HarnessError>,
{
    PollPolicy {
        timeout,
        interval,
    }
    .run(predicate)
    .await
}

// ============================================================================
// SECTION: Tests
// ============================================================================
