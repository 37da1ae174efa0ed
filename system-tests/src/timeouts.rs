// system-tests/src/timeouts.rs
// ============================================================================
// Module: Harness Timeouts
// Description: Request timeout constants with an optional configured floor.
// Purpose: Keep harness timeouts consistent and tunable for slow deployments.
// ============================================================================

//! ## Overview
//! Health checks always use the fixed [`HEALTH_CHECK_TIMEOUT`]; a service
//! that answers later than that is not ready. API and login requests use
//! [`REQUEST_TIMEOUT`], raised to the configured floor by [`resolve_timeout`]
//! when `STREAMFLOW_SYSTEM_TEST_TIMEOUT_SEC` is set.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Timeout for a single health-check request.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);
/// Timeout for API and login requests.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Returns the effective timeout, honoring the configured floor when set.
/// The floor acts as a minimum so explicitly longer timeouts are never shortened.
#[must_use]
pub fn resolve_timeout(requested: Duration, floor: Option<Duration>) -> Duration {
    floor.map_or(requested, |floor| std::cmp::max(requested, floor))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
