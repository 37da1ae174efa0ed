// system-tests/src/concurrency.rs
// ============================================================================
// Module: Concurrent Fan-Out
// Description: Issue N independent async operations at once.
// Purpose: Exercise rate limiting and concurrent request handling.
// Dependencies: tokio
// ============================================================================

//! ## Overview
//! [`fan_out`] spawns every operation before awaiting any of them, then
//! collects the outcomes in index order. A task that panics surfaces as
//! [`HarnessError::Task`] in its slot rather than tearing down the test.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;

use crate::error::HarnessError;

// ============================================================================
// SECTION: Fan-Out
// ============================================================================

/// Runs `count` operations concurrently and returns their outcomes in index order.
///
/// `make` is called once per index, in order, before any outcome is awaited.
pub async fn fan_out<F, Fut, T>(count: usize, mut make: F) -> Vec<Result<T, HarnessError>>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<T, HarnessError>> + Send + 'static,
    T: Send + 'static,
{
    let handles: Vec<_> = (0 .. count).map(|index| tokio::spawn(make(index))).collect();
    let mut outcomes = Vec::with_capacity(count);
    for handle in handles {
        let outcome = match handle.await {
            Ok(result) => result,
            Err(err) => Err(HarnessError::Task(err.to_string())),
        };
        outcomes.push(outcome);
    }
    outcomes
}

// ============================================================================
// SECTION: Tests
// ============================================================================
