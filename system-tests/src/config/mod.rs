// system-tests/src/config/mod.rs
// ============================================================================
// Module: Harness Configuration
// Description: Centralized configuration for StreamFlow system tests.
// Purpose: Provide typed access to deployment URLs, credentials, and tuning.
// Dependencies: std, url
// ============================================================================

//! ## Overview
//! Harness configuration is read from environment variables once and mapped
//! into an immutable [`HarnessConfig`] that is handed to the harness at
//! construction.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod env;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use env::DEFAULT_ADMIN_EMAIL;
pub use env::DEFAULT_ADMIN_PASSWORD;
pub use env::DEFAULT_API_BASE_URL;
pub use env::DEFAULT_AUTH_SERVICE_URL;
pub use env::DEFAULT_HEALTH_CHECK_DELAY;
pub use env::DEFAULT_HEALTH_CHECK_RETRIES;
pub use env::HarnessConfig;
pub use env::HarnessEnv;
pub use env::read_env_strict;
