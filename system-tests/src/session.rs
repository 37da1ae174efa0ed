// system-tests/src/session.rs
// ============================================================================
// Module: Session Manager
// Description: Credential exchange against the login endpoint.
// Purpose: Turn an email/password pair into bearer tokens for suites.
// Dependencies: reqwest, serde, serde_json, tracing
// ============================================================================

//! ## Overview
//! Every call performs a fresh `POST /auth/login`; nothing is cached. Tokens
//! only ever come from a 200 login response. Any other status becomes
//! [`HarnessError::AuthenticationFailed`] carrying the server's message, so
//! suites can expect and match on rejected logins.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::HarnessError;
use crate::fixtures::id_from_body;
use crate::http::ApiClient;
use crate::http::ApiResponse;
use crate::http::body_message;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Login endpoint path.
pub const LOGIN_PATH: &str = "/auth/login";
/// Message used when a rejected login carries no server message.
const DEFAULT_LOGIN_FAILURE: &str = "Invalid credentials";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Tokens returned by a successful login.
#[derive(Clone, PartialEq)]
pub struct SessionTokens {
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// Refresh token, when the deployment issues one.
    pub refresh_token: Option<String>,
    /// Server-side user record, verbatim.
    pub user: Value,
}

impl SessionTokens {
    /// Returns the user id as text; numeric ids are stringified.
    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        id_from_body(&self.user)
    }

    /// Returns the user email.
    #[must_use]
    pub fn user_email(&self) -> Option<&str> {
        self.user.get("email").and_then(Value::as_str)
    }

    /// Returns the user role label (for example `Administrador`).
    #[must_use]
    pub fn user_role(&self) -> Option<&str> {
        self.user.get("role").and_then(Value::as_str)
    }
}

impl fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokens")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// Login request payload.
#[derive(Serialize)]
struct LoginRequest<'a> {
    /// Account email.
    email: &'a str,
    /// Account password.
    password: &'a str,
}

/// Fields read from a 200 login response.
#[derive(Deserialize)]
struct LoginResponse {
    /// Bearer token.
    access_token: String,
    /// Optional refresh token.
    #[serde(default)]
    refresh_token: Option<String>,
    /// User record.
    #[serde(default)]
    user: Value,
}

// ============================================================================
// SECTION: Operations
// ============================================================================

/// Exchanges credentials for tokens with a single login request.
///
/// # Errors
///
/// Returns [`HarnessError::AuthenticationFailed`] for any non-200 status or a
/// 200 without `access_token`, and [`HarnessError::Http`] on transport failure.
pub async fn authenticate(
    client: &ApiClient,
    email: &str,
    password: &str,
) -> Result<SessionTokens, HarnessError> {
    debug!(email, login_url = %client.url(LOGIN_PATH), "attempting authentication");
    let response = client
        .post(LOGIN_PATH, &LoginRequest {
            email,
            password,
        })
        .await?;
    debug!(email, status = response.status, "login responded");
    tokens_from_response(response)
}

/// Maps a login response to tokens or an authentication failure.
fn tokens_from_response(response: ApiResponse) -> Result<SessionTokens, HarnessError> {
    if response.status != 200 {
        let message = body_message(&response.body, &["message", "detail"])
            .unwrap_or_else(|| DEFAULT_LOGIN_FAILURE.to_string());
        return Err(HarnessError::AuthenticationFailed {
            status: response.status,
            message,
        });
    }
    let status = response.status;
    let parsed: LoginResponse =
        serde_json::from_value(response.body).map_err(|err| HarnessError::AuthenticationFailed {
            status,
            message: format!("login response missing access_token: {err}"),
        })?;
    Ok(SessionTokens {
        access_token: parsed.access_token,
        refresh_token: parsed.refresh_token,
        user: parsed.user,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
