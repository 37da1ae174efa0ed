// system-tests/src/lib.rs
// ============================================================================
// Module: StreamFlow System Tests Library
// Description: Harness for end-to-end tests against a StreamFlow deployment.
// Purpose: Provide readiness, session, client, fixture, and polling helpers.
// Dependencies: reqwest, serde_json, tokio, tracing
// ============================================================================

//! ## Overview
//! This crate hosts the test harness shared by the StreamFlow end-to-end
//! suites in `system-tests/tests`. The harness waits for the deployment to
//! become healthy, exchanges credentials for bearer tokens, builds HTTP
//! clients around those tokens, creates disposable fixtures, and offers
//! retry/poll primitives and status assertions.
//!
//! Every service under test is an opaque HTTP endpoint. Responses are
//! surfaced raw as [`ApiResponse`] values; the harness never turns an HTTP
//! error status into a failure unless an operation's contract says so.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod assertions;
pub mod concurrency;
pub mod config;
pub mod deployment;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod http;
pub mod logging;
pub mod readiness;
pub mod retry;
pub mod session;
pub mod timeouts;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use assertions::assert_response;
pub use assertions::assert_status_in;
pub use assertions::extract_collection;
pub use concurrency::fan_out;
pub use config::HarnessConfig;
pub use deployment::DeploymentProfile;
pub use deployment::ExpectedStatuses;
pub use error::HarnessError;
pub use fixtures::PlaylistOverrides;
pub use fixtures::Role;
pub use fixtures::TestPlaylist;
pub use fixtures::TestUser;
pub use fixtures::TestVideo;
pub use fixtures::UserOverrides;
pub use fixtures::VideoOverrides;
pub use fixtures::generate_random_email;
pub use fixtures::generate_random_string;
pub use harness::Harness;
pub use http::ApiClient;
pub use http::ApiResponse;
pub use http::AuthenticatedClient;
pub use readiness::ServiceEndpoint;
pub use retry::PollPolicy;
pub use retry::RetryPolicy;
pub use retry::retry;
pub use retry::wait_for;
pub use session::SessionTokens;
