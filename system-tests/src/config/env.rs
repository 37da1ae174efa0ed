// system-tests/src/config/env.rs
// ============================================================================
// Module: Harness Environment
// Description: Environment-backed configuration for the test harness.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std, url
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8, empty values, and malformed numbers or
//! URLs fail closed. Unset keys fall back to the documented defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use url::Url;

use crate::deployment::DeploymentProfile;
use crate::error::HarnessError;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// API gateway URL used when `API_BASE_URL` is unset.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
/// Auth service URL used when `AUTH_SERVICE_URL` is unset.
pub const DEFAULT_AUTH_SERVICE_URL: &str = "http://localhost:8001";
/// Admin email used when `TEST_ADMIN_EMAIL` is unset.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@streamflow.com";
/// Admin password used when `TEST_ADMIN_PASSWORD` is unset.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
/// Health-check attempts per service.
pub const DEFAULT_HEALTH_CHECK_RETRIES: u32 = 10;
/// Delay between health-check attempts.
pub const DEFAULT_HEALTH_CHECK_DELAY: Duration = Duration::from_millis(5000);

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for harness configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessEnv {
    /// Load balancer base URL.
    BaseUrl,
    /// API gateway base URL.
    ApiBaseUrl,
    /// Auth service base URL.
    AuthServiceUrl,
    /// Admin identity email.
    AdminEmail,
    /// Admin identity password.
    AdminPassword,
    /// Health-check attempts per service (positive integer).
    HealthCheckRetries,
    /// Delay between health-check attempts in milliseconds.
    HealthCheckDelay,
    /// Deployment profile label (`split` or `unified`).
    Deployment,
    /// Minimum request timeout in seconds (positive integer).
    TimeoutSeconds,
}

impl HarnessEnv {
    /// Every key, in documentation order.
    pub const ALL: [Self; 9] = [
        Self::BaseUrl,
        Self::ApiBaseUrl,
        Self::AuthServiceUrl,
        Self::AdminEmail,
        Self::AdminPassword,
        Self::HealthCheckRetries,
        Self::HealthCheckDelay,
        Self::Deployment,
        Self::TimeoutSeconds,
    ];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseUrl => "BASE_URL",
            Self::ApiBaseUrl => "API_BASE_URL",
            Self::AuthServiceUrl => "AUTH_SERVICE_URL",
            Self::AdminEmail => "TEST_ADMIN_EMAIL",
            Self::AdminPassword => "TEST_ADMIN_PASSWORD",
            Self::HealthCheckRetries => "HEALTH_CHECK_RETRIES",
            Self::HealthCheckDelay => "HEALTH_CHECK_DELAY",
            Self::Deployment => "STREAMFLOW_DEPLOYMENT",
            Self::TimeoutSeconds => "STREAMFLOW_SYSTEM_TEST_TIMEOUT_SEC",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed harness configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Load balancer base URL.
    pub base_url: String,
    /// API gateway base URL.
    pub api_base_url: String,
    /// Auth service base URL.
    pub auth_service_url: String,
    /// Admin identity email.
    pub admin_email: String,
    /// Admin identity password.
    pub admin_password: String,
    /// Health-check attempts per service.
    pub health_check_retries: u32,
    /// Delay between health-check attempts.
    pub health_check_delay: Duration,
    /// Deployment shape of the system under test.
    pub deployment: DeploymentProfile,
    /// Optional floor applied to every request timeout.
    pub timeout_floor: Option<Duration>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let deployment = DeploymentProfile::default();
        Self {
            base_url: deployment.default_base_url().to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_service_url: DEFAULT_AUTH_SERVICE_URL.to_string(),
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            health_check_retries: DEFAULT_HEALTH_CHECK_RETRIES,
            health_check_delay: DEFAULT_HEALTH_CHECK_DELAY,
            deployment,
            timeout_floor: None,
        }
    }
}

impl HarnessConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Config`] when an environment value is not valid
    /// UTF-8, is empty, or fails validation (bad URL, number, or profile).
    pub fn load() -> Result<Self, HarnessError> {
        let deployment = read_env_nonempty(HarnessEnv::Deployment)?
            .map(|raw| {
                DeploymentProfile::parse(&raw).ok_or_else(|| {
                    config_error(HarnessEnv::Deployment, "must be split or unified")
                })
            })
            .transpose()?
            .unwrap_or_default();
        let base_url = read_url(HarnessEnv::BaseUrl, deployment.default_base_url())?;
        let api_base_url = read_url(HarnessEnv::ApiBaseUrl, DEFAULT_API_BASE_URL)?;
        let auth_service_url = read_url(HarnessEnv::AuthServiceUrl, DEFAULT_AUTH_SERVICE_URL)?;
        let admin_email = read_env_nonempty(HarnessEnv::AdminEmail)?
            .unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string());
        let admin_password = read_env_nonempty(HarnessEnv::AdminPassword)?
            .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string());
        let health_check_retries = read_env_nonempty(HarnessEnv::HealthCheckRetries)?
            .map(|raw| parse_positive(HarnessEnv::HealthCheckRetries, &raw))
            .transpose()?
            .map_or(Ok(DEFAULT_HEALTH_CHECK_RETRIES), |value| {
                u32::try_from(value)
                    .map_err(|_| config_error(HarnessEnv::HealthCheckRetries, "is too large"))
            })?;
        let health_check_delay = read_env_nonempty(HarnessEnv::HealthCheckDelay)?
            .map(|raw| parse_millis(HarnessEnv::HealthCheckDelay, &raw))
            .transpose()?
            .unwrap_or(DEFAULT_HEALTH_CHECK_DELAY);
        let timeout_floor = read_env_nonempty(HarnessEnv::TimeoutSeconds)?
            .map(|raw| parse_positive(HarnessEnv::TimeoutSeconds, &raw).map(Duration::from_secs))
            .transpose()?;
        Ok(Self {
            base_url,
            api_base_url,
            auth_service_url,
            admin_email,
            admin_password,
            health_check_retries,
            health_check_delay,
            deployment,
            timeout_floor,
        })
    }

    /// Base URL that receives `POST /auth/login` for this deployment.
    #[must_use]
    pub fn login_base_url(&self) -> &str {
        if self.deployment.login_via_auth_service() {
            &self.auth_service_url
        } else {
            &self.base_url
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, HarnessError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|_| HarnessError::Config(format!("{name} must be valid UTF-8")))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
fn read_env_nonempty(key: HarnessEnv) -> Result<Option<String>, HarnessError> {
    match read_env_strict(key.as_str())? {
        Some(value) if value.trim().is_empty() => Err(config_error(key, "must not be empty")),
        Some(value) => Ok(Some(value.trim().to_string())),
        None => Ok(None),
    }
}

/// Reads a URL variable, validating it and stripping any trailing slash.
///
/// # Errors
///
/// Returns an error when the value does not parse as an absolute http(s) URL.
fn read_url(key: HarnessEnv, default: &str) -> Result<String, HarnessError> {
    let raw = read_env_nonempty(key)?.unwrap_or_else(|| default.to_string());
    let parsed = Url::parse(&raw).map_err(|err| config_error(key, &format!("is not a URL: {err}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(config_error(key, "must use http or https"));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

/// Parses a positive integer value.
///
/// # Errors
///
/// Returns an error when the value is non-numeric or zero.
fn parse_positive(key: HarnessEnv, raw: &str) -> Result<u64, HarnessError> {
    let value: u64 =
        raw.trim().parse().map_err(|_| config_error(key, "must be a positive integer"))?;
    if value == 0 {
        return Err(config_error(key, "must be greater than zero"));
    }
    Ok(value)
}

/// Parses a non-negative millisecond count.
///
/// # Errors
///
/// Returns an error when the value is non-numeric.
fn parse_millis(key: HarnessEnv, raw: &str) -> Result<Duration, HarnessError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| config_error(key, "must be a non-negative integer number of milliseconds"))
}

/// Builds a config error naming the offending key.
fn config_error(key: HarnessEnv, reason: &str) -> HarnessError {
    HarnessError::Config(format!("{} {reason}", key.as_str()))
}
