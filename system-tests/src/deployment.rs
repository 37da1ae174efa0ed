// system-tests/src/deployment.rs
// ============================================================================
// Module: Deployment Profiles
// Description: Per-deployment routing and expected status codes.
// Purpose: Keep divergent API contracts explicit instead of guessed.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! StreamFlow is deployed in two shapes that disagree on a handful of
//! contracts. A [`DeploymentProfile`] captures the routing differences (where
//! logins go, how user names are sent) and an [`ExpectedStatuses`] table
//! holds the accepted status codes for the operations known to diverge.
//!
//! Where suites written against the same deployment disagree, the table
//! accepts every observed code rather than picking one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Profiles
// ============================================================================

/// Deployment shape of the system under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentProfile {
    /// TLS load balancer in front; logins go straight to the auth service.
    #[default]
    Split,
    /// Plain HTTP load balancer in front of every service, logins included.
    Unified,
}

/// How a deployment expects the user's display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStyle {
    /// Separate `first_name` and `last_name` fields.
    FirstLast,
    /// A single `name` field.
    Single,
}

impl NameStyle {
    /// Builds the JSON fields that carry a user's name in this encoding.
    #[must_use]
    pub fn name_fields(self, first_name: &str, last_name: &str) -> Map<String, Value> {
        let mut fields = Map::new();
        match self {
            Self::FirstLast => {
                fields.insert("first_name".to_string(), Value::String(first_name.to_string()));
                fields.insert("last_name".to_string(), Value::String(last_name.to_string()));
            }
            Self::Single => {
                let name = format!("{first_name} {last_name}").trim().to_string();
                fields.insert("name".to_string(), Value::String(name));
            }
        }
        fields
    }
}

impl DeploymentProfile {
    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Split => "split",
            Self::Unified => "unified",
        }
    }

    /// Parses a profile label, case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("split") {
            Some(Self::Split)
        } else if trimmed.eq_ignore_ascii_case("unified") {
            Some(Self::Unified)
        } else {
            None
        }
    }

    /// Load balancer URL used when `BASE_URL` is unset.
    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::Split => "https://localhost",
            Self::Unified => "http://localhost:80",
        }
    }

    /// Whether logins are sent to the auth service rather than the load balancer.
    #[must_use]
    pub const fn login_via_auth_service(self) -> bool {
        matches!(self, Self::Split)
    }

    /// Display-name encoding used on user creation.
    #[must_use]
    pub const fn name_style(self) -> NameStyle {
        match self {
            Self::Split => NameStyle::FirstLast,
            Self::Unified => NameStyle::Single,
        }
    }

    /// Role label the deployment reports for the admin identity.
    #[must_use]
    pub const fn admin_role_label(self) -> &'static str {
        match self {
            Self::Split => "Administrador",
            Self::Unified => "admin",
        }
    }

    /// Accepted status codes for operations whose contract diverges.
    #[must_use]
    pub const fn expected_statuses(self) -> ExpectedStatuses {
        match self {
            Self::Split => ExpectedStatuses {
                invalid_email_on_create: &[400, 500],
                login_validation_failure: &[422],
                unknown_login: &[401],
                duplicate_email: &[400, 409],
                created: &[200, 201],
                fresh_user_login: &[200, 401],
            },
            Self::Unified => ExpectedStatuses {
                invalid_email_on_create: &[400],
                login_validation_failure: &[400, 401],
                unknown_login: &[401],
                duplicate_email: &[400, 409],
                created: &[201],
                fresh_user_login: &[200],
            },
        }
    }
}

// ============================================================================
// SECTION: Expected Statuses
// ============================================================================

/// Accepted status codes for contract points that differ between deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedStatuses {
    /// `POST /usuarios` with a malformed email.
    pub invalid_email_on_create: &'static [u16],
    /// `POST /auth/login` with a missing field.
    pub login_validation_failure: &'static [u16],
    /// `POST /auth/login` for an unknown email or wrong password.
    pub unknown_login: &'static [u16],
    /// `POST /usuarios` with an email that already exists.
    pub duplicate_email: &'static [u16],
    /// `POST /usuarios` success.
    pub created: &'static [u16],
    /// `POST /auth/login` for a user registered moments earlier; the split
    /// deployment keeps accounts in a store the auth service may not see yet.
    pub fresh_user_login: &'static [u16],
}

// ============================================================================
// SECTION: Tests
// ============================================================================
