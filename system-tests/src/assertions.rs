// system-tests/src/assertions.rs
// ============================================================================
// Module: Response Assertions
// Description: Status checks with body diagnostics.
// Purpose: Fail a test with the server's explanation attached.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Assertions return `Result` instead of panicking so suites decide how a
//! mismatch ends the test. Mismatch errors carry the response body (its
//! `message` field when present, otherwise the full JSON).

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::error::HarnessError;
use crate::http::ApiResponse;

// ============================================================================
// SECTION: Assertions
// ============================================================================

/// Checks `response` against a single expected status and returns its body.
///
/// # Errors
///
/// Returns [`HarnessError::AssertionMismatch`] when the status differs.
pub fn assert_response(
    response: &ApiResponse,
    expected: u16,
    message: Option<&str>,
) -> Result<Value, HarnessError> {
    if response.status == expected {
        return Ok(response.body.clone());
    }
    let body_detail = response
        .body
        .get("message")
        .and_then(Value::as_str)
        .map_or_else(|| dump_body(&response.body), str::to_string);
    let detail = match message {
        Some(message) => format!("{message}: {body_detail}"),
        None => body_detail,
    };
    Err(HarnessError::AssertionMismatch {
        expected,
        actual: response.status,
        detail,
    })
}

/// Checks that `response` carries one of `accepted` statuses.
///
/// # Errors
///
/// Returns [`HarnessError::UnexpectedStatus`] when it does not.
pub fn assert_status_in(response: &ApiResponse, accepted: &[u16]) -> Result<(), HarnessError> {
    if accepted.contains(&response.status) {
        return Ok(());
    }
    Err(HarnessError::UnexpectedStatus {
        expected: accepted.to_vec(),
        actual: response.status,
        body: dump_body(&response.body),
    })
}

/// Returns the item array of a list response.
///
/// Accepts a bare array or an object wrapping it under `users` or `data`.
#[must_use]
pub fn extract_collection(body: &Value) -> Option<&Vec<Value>> {
    body.as_array().or_else(|| {
        ["users", "data"].iter().find_map(|key| body.get(key).and_then(Value::as_array))
    })
}

/// Serializes a body for diagnostics.
fn dump_body(body: &Value) -> String {
    serde_json::to_string(body).unwrap_or_else(|_| String::from("<unprintable body>"))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
