// system-tests/src/harness.rs
// ============================================================================
// Module: Test Harness
// Description: Entry point tying readiness, sessions, clients, and fixtures.
// Purpose: Give suites one configured handle onto the deployment under test.
// Dependencies: reqwest, tokio, tracing
// ============================================================================

//! ## Overview
//! A [`Harness`] owns an immutable [`HarnessConfig`] plus two unauthenticated
//! clients: one on the load balancer for public endpoints and fixtures, one on
//! the login target of the active [`crate::DeploymentProfile`]. Every other
//! client is built on demand and owned by the caller, so no harness state is
//! ever mutated by a test.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing::info;

use crate::config::HarnessConfig;
use crate::deployment::ExpectedStatuses;
use crate::error::HarnessError;
use crate::fixtures::PlaylistOverrides;
use crate::fixtures::TestPlaylist;
use crate::fixtures::TestUser;
use crate::fixtures::TestVideo;
use crate::fixtures::UserOverrides;
use crate::fixtures::VideoOverrides;
use crate::fixtures::create_playlist;
use crate::fixtures::create_user;
use crate::fixtures::create_video;
use crate::http::ApiClient;
use crate::http::AuthenticatedClient;
use crate::readiness::ServiceEndpoint;
use crate::readiness::health_check_client;
use crate::readiness::wait_for_endpoints;
use crate::session::SessionTokens;
use crate::session::authenticate;
use crate::timeouts::REQUEST_TIMEOUT;
use crate::timeouts::resolve_timeout;

// ============================================================================
// SECTION: Harness
// ============================================================================

/// Configured handle onto a StreamFlow deployment.
#[derive(Debug, Clone)]
pub struct Harness {
    /// Configuration fixed at construction.
    config: HarnessConfig,
    /// Unauthenticated client on the load balancer.
    public: ApiClient,
    /// Unauthenticated client on the login target.
    login: ApiClient,
}

impl Harness {
    /// Builds a harness from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Http`] when the HTTP clients cannot be built.
    pub fn new(config: HarnessConfig) -> Result<Self, HarnessError> {
        let timeout = resolve_timeout(REQUEST_TIMEOUT, config.timeout_floor);
        let public = ApiClient::unauthenticated(&config.base_url, timeout)?;
        let login = ApiClient::unauthenticated(config.login_base_url(), timeout)?;
        Ok(Self {
            config,
            public,
            login,
        })
    }

    /// Builds a harness from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Config`] for invalid environment values.
    pub fn from_env() -> Result<Self, HarnessError> {
        Self::new(HarnessConfig::load()?)
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Returns the accepted statuses for the active deployment profile.
    #[must_use]
    pub const fn expected_statuses(&self) -> ExpectedStatuses {
        self.config.deployment.expected_statuses()
    }

    // ------------------------------------------------------------------------
    // Readiness
    // ------------------------------------------------------------------------

    /// Waits, in order, for the load balancer, API gateway, and auth service.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::ServiceUnavailable`] for the first service that
    /// exhausts its health-check budget.
    pub async fn wait_for_services(&self) -> Result<(), HarnessError> {
        info!(
            deployment = self.config.deployment.as_str(),
            retries = self.config.health_check_retries,
            "waiting for services to be ready"
        );
        let client = health_check_client()?;
        wait_for_endpoints(
            &client,
            &ServiceEndpoint::defaults_for(&self.config),
            self.config.health_check_retries,
            self.config.health_check_delay,
        )
        .await?;
        info!("all services are ready");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------------

    /// Logs in with the given credentials.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::AuthenticationFailed`] on any non-200 login.
    pub async fn authenticate_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionTokens, HarnessError> {
        authenticate(&self.login, email, password).await
    }

    /// Logs in as the configured admin identity.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::AuthenticationFailed`] on any non-200 login.
    pub async fn admin_tokens(&self) -> Result<SessionTokens, HarnessError> {
        self.authenticate_user(&self.config.admin_email, &self.config.admin_password).await
    }

    // ------------------------------------------------------------------------
    // Clients
    // ------------------------------------------------------------------------

    /// Builds a client on the API gateway bound to `access_token`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Config`] when the token is not a valid header
    /// value, or [`HarnessError::Http`] when the client cannot be built.
    pub fn authenticated_client(
        &self,
        access_token: &str,
    ) -> Result<AuthenticatedClient, HarnessError> {
        AuthenticatedClient::new(
            &self.config.api_base_url,
            access_token,
            resolve_timeout(REQUEST_TIMEOUT, self.config.timeout_floor),
        )
    }

    /// Returns the unauthenticated client on the load balancer.
    #[must_use]
    pub const fn public_client(&self) -> &ApiClient {
        &self.public
    }

    /// Builds a load-balancer client that sends `authorization` verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Config`] when the value is not a valid header.
    pub fn raw_client_with_authorization(
        &self,
        authorization: &str,
    ) -> Result<ApiClient, HarnessError> {
        ApiClient::with_authorization(
            &self.config.base_url,
            authorization,
            resolve_timeout(REQUEST_TIMEOUT, self.config.timeout_floor),
        )
    }

    // ------------------------------------------------------------------------
    // Fixtures
    // ------------------------------------------------------------------------

    /// Registers a user through the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::FixtureCreationFailed`] unless the server
    /// answers 201.
    pub async fn create_test_user(&self, overrides: UserOverrides) -> Result<TestUser, HarnessError> {
        create_user(&self.public, overrides, self.config.deployment.name_style()).await
    }

    /// Creates a video with the caller's authenticated client.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::FixtureCreationFailed`] unless the server
    /// answers 201.
    pub async fn create_test_video(
        &self,
        client: &AuthenticatedClient,
        overrides: VideoOverrides,
    ) -> Result<TestVideo, HarnessError> {
        create_video(client.api(), overrides).await
    }

    /// Creates a playlist with the caller's authenticated client.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::FixtureCreationFailed`] unless the server
    /// answers 201.
    pub async fn create_test_playlist(
        &self,
        client: &AuthenticatedClient,
        overrides: PlaylistOverrides,
    ) -> Result<TestPlaylist, HarnessError> {
        create_playlist(client.api(), overrides).await
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
