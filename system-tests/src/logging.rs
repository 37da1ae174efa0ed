// system-tests/src/logging.rs
// ============================================================================
// Module: Test Logging
// Description: One-time tracing subscriber installation for test binaries.
// Purpose: Route harness events to the libtest capture when RUST_LOG is set.
// Dependencies: tracing-subscriber
// ============================================================================

//! ## Overview
//! Suites call [`init_test_logging`] from their setup path. The subscriber is
//! only installed when `RUST_LOG` is present, so default runs stay quiet, and
//! a subscriber installed elsewhere first is left in place.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Once;

use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: State
// ============================================================================

/// Guards subscriber installation.
static INIT: Once = Once::new();

/// Environment variable carrying the filter directives.
const LOG_FILTER_ENV: &str = "RUST_LOG";

// ============================================================================
// SECTION: Installation
// ============================================================================

/// Installs a fmt subscriber writing through the test writer, once per process.
pub fn init_test_logging() {
    INIT.call_once(|| {
        if std::env::var_os(LOG_FILTER_ENV).is_none() {
            return;
        }
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    });
}
