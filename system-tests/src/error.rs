// system-tests/src/error.rs
// ============================================================================
// Module: Harness Errors
// Description: Error taxonomy for the StreamFlow test harness.
// Purpose: Carry diagnostic context for every harness failure path.
// Dependencies: thiserror, reqwest
// ============================================================================

//! ## Overview
//! A single error type covers the harness. Variants map onto how a failure
//! affects the test run: readiness exhaustion is fatal to the whole run,
//! authentication failures are often an expected outcome, and fixture or
//! assertion failures end the individual test.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use thiserror::Error;

// ============================================================================
// SECTION: Error Types
// ============================================================================

/// Errors raised by harness operations.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Invalid or unreadable configuration.
    #[error("config error: {0}")]
    Config(String),
    /// A dependent service never reported healthy.
    #[error("{service} failed to start after {attempts} attempts")]
    ServiceUnavailable {
        /// Display name of the service.
        service: String,
        /// Number of health checks issued.
        attempts: u32,
    },
    /// Login returned a non-200 status or an unusable payload.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        /// HTTP status returned by the login endpoint.
        status: u16,
        /// Server-provided or default message.
        message: String,
    },
    /// A fixture POST did not return 201.
    #[error("Failed to create test {fixture}: {message}")]
    FixtureCreationFailed {
        /// Fixture kind (`user`, `video`, `playlist`).
        fixture: &'static str,
        /// HTTP status returned by the creation endpoint.
        status: u16,
        /// Server-provided or default message.
        message: String,
    },
    /// Response status differed from the single expected status.
    #[error("Expected status {expected}, got {actual}: {detail}")]
    AssertionMismatch {
        /// Expected HTTP status.
        expected: u16,
        /// Observed HTTP status.
        actual: u16,
        /// Caller message and response body diagnostics.
        detail: String,
    },
    /// Response status was outside an accepted set.
    #[error("expected status to be one of [{}], got {actual}: {body}", join_statuses(.expected))]
    UnexpectedStatus {
        /// Accepted HTTP statuses.
        expected: Vec<u16>,
        /// Observed HTTP status.
        actual: u16,
        /// JSON dump of the response body.
        body: String,
    },
    /// A polled condition never became true.
    #[error("Condition not met within {}ms", .timeout.as_millis())]
    Timeout {
        /// The polling bound that elapsed.
        timeout: Duration,
    },
    /// Transport-level HTTP failure (connect, timeout, decode).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// A fan-out task panicked or was cancelled.
    #[error("task failed: {0}")]
    Task(String),
}

impl HarnessError {
    /// Returns the HTTP status attached to the error, when there is one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::AuthenticationFailed {
                status, ..
            }
            | Self::FixtureCreationFailed {
                status, ..
            } => Some(*status),
            Self::AssertionMismatch {
                actual, ..
            }
            | Self::UnexpectedStatus {
                actual, ..
            } => Some(*actual),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Renders a status list as `a, b, c`.
fn join_statuses(statuses: &[u16]) -> String {
    statuses.iter().map(u16::to_string).collect::<Vec<_>>().join(", ")
}
