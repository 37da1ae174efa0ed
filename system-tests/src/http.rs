// system-tests/src/http.rs
// ============================================================================
// Module: Harness HTTP Clients
// Description: Thin reqwest wrappers that surface raw status and JSON body.
// Purpose: Let suites assert on every response without transport surprises.
// Dependencies: reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! [`ApiClient`] issues requests relative to a fixed base URL and returns an
//! [`ApiResponse`] for every HTTP status; only transport failures (connect,
//! timeout) become errors. [`AuthenticatedClient`] binds one bearer token for
//! its whole lifetime and never refreshes it.
//!
//! Deployments front their services with self-signed certificates, so every
//! client built here accepts invalid certificates.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use reqwest::Method;
use reqwest::RequestBuilder;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use serde::Serialize;
use serde_json::Value;

use crate::error::HarnessError;

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Raw outcome of a harness-issued request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Decoded JSON body; `Null` when empty, a JSON string when not JSON.
    pub body: Value,
}

impl ApiResponse {
    /// Builds a response from parts.
    #[must_use]
    pub const fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
        }
    }

    /// Drains a reqwest response into status and body.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Http`] when the body cannot be read.
    pub async fn from_response(response: reqwest::Response) -> Result<Self, HarnessError> {
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        Ok(Self::new(status, body))
    }

    /// Returns a top-level body field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }

    /// Whether the body has a top-level field with this name.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Returns a top-level string field.
    #[must_use]
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// Returns the first server message among `message`, `detail`, and `error`.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        body_message(&self.body, &["message", "detail", "error"])
    }
}

/// Returns the first present, non-null field among `keys` as text.
///
/// Non-string values (for example a validation `detail` array) are rendered
/// as compact JSON.
#[must_use]
pub fn body_message(body: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match body.get(*key) {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(other) => Some(other.to_string()),
    })
}

// ============================================================================
// SECTION: Client Construction
// ============================================================================

/// Builds a reqwest client that accepts self-signed certificates.
///
/// # Errors
///
/// Returns [`HarnessError::Http`] when the TLS backend fails to initialize.
pub fn build_http_client(timeout: Duration, headers: HeaderMap) -> Result<Client, HarnessError> {
    Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .danger_accept_invalid_certs(true)
        .build()
        .map_err(HarnessError::from)
}

/// Default headers shared by every API client.
fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// Builds a sensitive `Authorization` header value.
fn authorization_value(raw: &str) -> Result<HeaderValue, HarnessError> {
    let mut value = HeaderValue::from_str(raw).map_err(|_| {
        HarnessError::Config("authorization value contains invalid header characters".to_string())
    })?;
    value.set_sensitive(true);
    Ok(value)
}

// ============================================================================
// SECTION: API Client
// ============================================================================

/// HTTP client bound to one base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Base URL without trailing slash.
    base_url: String,
    /// Underlying reqwest client.
    client: Client,
}

impl ApiClient {
    /// Wraps an existing reqwest client.
    #[must_use]
    pub fn new(base_url: impl Into<String>, client: Client) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Builds an unauthenticated JSON client.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Http`] when the client cannot be built.
    pub fn unauthenticated(base_url: &str, timeout: Duration) -> Result<Self, HarnessError> {
        Ok(Self::new(base_url, build_http_client(timeout, json_headers())?))
    }

    /// Builds a JSON client that sends `authorization` verbatim on every request.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Config`] when the value is not a valid header.
    pub fn with_authorization(
        base_url: &str,
        authorization: &str,
        timeout: Duration,
    ) -> Result<Self, HarnessError> {
        let mut headers = json_headers();
        headers.insert(AUTHORIZATION, authorization_value(authorization)?);
        Ok(Self::new(base_url, build_http_client(timeout, headers)?))
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves a path against the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issues a GET request.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Http`] on transport failure.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, HarnessError> {
        Self::send(self.client.get(self.url(path))).await
    }

    /// Issues a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Http`] on transport or serialization failure.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ApiResponse, HarnessError> {
        Self::send(self.client.post(self.url(path)).json(body)).await
    }

    /// Issues a POST request without a body.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Http`] on transport failure.
    pub async fn post_empty(&self, path: &str) -> Result<ApiResponse, HarnessError> {
        Self::send(self.client.post(self.url(path))).await
    }

    /// Issues a PATCH request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Http`] on transport or serialization failure.
    pub async fn patch<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ApiResponse, HarnessError> {
        Self::send(self.client.patch(self.url(path)).json(body)).await
    }

    /// Issues a DELETE request.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Http`] on transport failure.
    pub async fn delete(&self, path: &str) -> Result<ApiResponse, HarnessError> {
        Self::send(self.client.delete(self.url(path))).await
    }

    /// Issues a request with an arbitrary method and optional JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Http`] on transport failure.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, HarnessError> {
        let mut builder = self.client.request(method, self.url(path));
        if let Some(body) = body {
            builder = builder.json(body);
        }
        Self::send(builder).await
    }

    /// Sends a prepared request and drains the response.
    async fn send(builder: RequestBuilder) -> Result<ApiResponse, HarnessError> {
        let response = builder.send().await?;
        ApiResponse::from_response(response).await
    }
}

// ============================================================================
// SECTION: Authenticated Client
// ============================================================================

/// HTTP client bound to one bearer token for its whole lifetime.
#[derive(Clone)]
pub struct AuthenticatedClient {
    /// Client carrying the `Authorization: Bearer` default header.
    api: ApiClient,
    /// Token fixed at construction.
    access_token: String,
}

impl AuthenticatedClient {
    /// Builds a client that sends `Authorization: Bearer <access_token>`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Config`] when the token is not a valid header
    /// value, or [`HarnessError::Http`] when the client cannot be built.
    pub fn new(
        base_url: &str,
        access_token: &str,
        timeout: Duration,
    ) -> Result<Self, HarnessError> {
        let api = ApiClient::with_authorization(base_url, &format!("Bearer {access_token}"), timeout)?;
        Ok(Self {
            api,
            access_token: access_token.to_string(),
        })
    }

    /// Returns the bearer token this client sends.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.api.base_url()
    }

    /// Returns the underlying API client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Issues an authenticated GET request.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Http`] on transport failure.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, HarnessError> {
        self.api.get(path).await
    }

    /// Issues an authenticated POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Http`] on transport failure.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ApiResponse, HarnessError> {
        self.api.post(path, body).await
    }

    /// Issues an authenticated POST request without a body.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Http`] on transport failure.
    pub async fn post_empty(&self, path: &str) -> Result<ApiResponse, HarnessError> {
        self.api.post_empty(path).await
    }

    /// Issues an authenticated PATCH request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Http`] on transport failure.
    pub async fn patch<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ApiResponse, HarnessError> {
        self.api.patch(path, body).await
    }

    /// Issues an authenticated DELETE request.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Http`] on transport failure.
    pub async fn delete(&self, path: &str) -> Result<ApiResponse, HarnessError> {
        self.api.delete(path).await
    }

    /// Issues an authenticated request with an arbitrary method.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Http`] on transport failure.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, HarnessError> {
        self.api.request(method, path, body).await
    }
}

impl fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("base_url", &self.api.base_url())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
