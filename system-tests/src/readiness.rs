// system-tests/src/readiness.rs
// ============================================================================
// Module: Readiness Waiter
// Description: Health-check polling for the services under test.
// Purpose: Block a test run until every dependent service reports healthy.
// Dependencies: reqwest, tokio, tracing
// ============================================================================

//! ## Overview
//! Endpoints are polled one after another, never concurrently. Each endpoint
//! gets a fixed attempt budget; a single `GET` answering 200 within the
//! health-check timeout counts as ready. Exhausting the budget for any
//! endpoint fails the whole wait with [`HarnessError::ServiceUnavailable`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use reqwest::Client;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use tokio::time::sleep;
use tracing::info;
use tracing::warn;

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::http::build_http_client;
use crate::timeouts::HEALTH_CHECK_TIMEOUT;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A service and the URL that reports its health.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    /// Display name used in logs and errors.
    pub name: String,
    /// Absolute health-check URL.
    pub health_check_url: String,
}

impl ServiceEndpoint {
    /// Builds an endpoint whose health check lives at `<base_url>/health`.
    #[must_use]
    pub fn at_base(name: &str, base_url: &str) -> Self {
        Self {
            name: name.to_string(),
            health_check_url: format!("{}/health", base_url.trim_end_matches('/')),
        }
    }

    /// The load balancer, API gateway, and auth service, in polling order.
    #[must_use]
    pub fn defaults_for(config: &HarnessConfig) -> Vec<Self> {
        vec![
            Self::at_base("Nginx Load Balancer", &config.base_url),
            Self::at_base("API Gateway", &config.api_base_url),
            Self::at_base("Auth Service", &config.auth_service_url),
        ]
    }
}

// ============================================================================
// SECTION: Polling
// ============================================================================

/// Builds the client used for health checks.
///
/// The request timeout is always [`HEALTH_CHECK_TIMEOUT`]; the configured
/// timeout floor does not apply to readiness.
///
/// # Errors
///
/// Returns [`HarnessError::Http`] when the client cannot be built.
pub fn health_check_client() -> Result<Client, HarnessError> {
    build_http_client(HEALTH_CHECK_TIMEOUT, HeaderMap::new())
}

/// Waits for each endpoint in sequence.
///
/// # Errors
///
/// Returns [`HarnessError::ServiceUnavailable`] for the first endpoint that
/// never reports healthy.
pub async fn wait_for_endpoints(
    client: &Client,
    endpoints: &[ServiceEndpoint],
    max_retries: u32,
    delay: Duration,
) -> Result<(), HarnessError> {
    for endpoint in endpoints {
        wait_for_service(client, endpoint, max_retries, delay).await?;
    }
    Ok(())
}

/// Polls one endpoint until it answers 200 or the attempt budget runs out.
///
/// No delay follows the final attempt.
///
/// # Errors
///
/// Returns [`HarnessError::ServiceUnavailable`] carrying the service name and
/// the number of attempts made.
pub async fn wait_for_service(
    client: &Client,
    endpoint: &ServiceEndpoint,
    max_retries: u32,
    delay: Duration,
) -> Result<(), HarnessError> {
    for attempt in 1..=max_retries {
        match client.get(&endpoint.health_check_url).send().await {
            Ok(response) if response.status() == StatusCode::OK => {
                info!(service = %endpoint.name, attempt, "service is ready");
                return Ok(());
            }
            Ok(response) => {
                warn!(
                    service = %endpoint.name,
                    attempt,
                    max_retries,
                    status = response.status().as_u16(),
                    "waiting for service"
                );
            }
            Err(err) => {
                warn!(
                    service = %endpoint.name,
                    attempt,
                    max_retries,
                    error = %err,
                    "waiting for service"
                );
            }
        }
        if attempt < max_retries {
            sleep(delay).await;
        }
    }
    Err(HarnessError::ServiceUnavailable {
        service: endpoint.name.clone(),
        attempts: max_retries,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
