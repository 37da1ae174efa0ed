// system-tests/tests/suites/auth.rs
// ============================================================================
// Module: Auth Tests
// Description: Registration, login, tokens, passwords, and logout.
// Purpose: Validate the authentication surface end to end.
// Dependencies: streamflow-system-tests, serde_json
// ============================================================================

//! ## Overview
//! Registration, login, token validation, password management, and logout.
//! Status codes that differ between deployments come from
//! [`streamflow_system_tests::ExpectedStatuses`]; scenarios that need a
//! fresh user's session skip on deployments where fresh accounts cannot log
//! in yet.

#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Test names describe the scenario under test."
)]

use serde_json::Value;
use serde_json::json;
use streamflow_system_tests::Harness;
use streamflow_system_tests::HarnessError;
use streamflow_system_tests::Role;
use streamflow_system_tests::TestUser;
use streamflow_system_tests::UserOverrides;
use streamflow_system_tests::assert_status_in;
use streamflow_system_tests::fan_out;
use streamflow_system_tests::generate_random_email;

use crate::helpers::sessions::admin_session;
use crate::helpers::sessions::fresh_user_session;
use crate::helpers::setup::TestResult;
use crate::helpers::setup::harness;

/// Registration payload for an ad-hoc identity in the deployment's encoding.
fn registration(harness: &Harness, overrides: UserOverrides) -> Value {
    TestUser::from_overrides(overrides).creation_payload(harness.config().deployment.name_style())
}

// ============================================================================
// SECTION: Registration
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn registration_returns_user_without_password() -> TestResult {
    let harness = harness().await?;
    let email = generate_random_email();
    let payload = registration(&harness, UserOverrides::default().email(email.clone()));

    let response = harness.public_client().post("/usuarios", &payload).await?;

    assert_status_in(&response, harness.expected_statuses().created)?;
    assert!(response.has_field("id"));
    assert_eq!(response.str_field("email"), Some(email.as_str()));
    assert_eq!(response.str_field("role"), Some(Role::StandardUser.as_str()));
    assert!(!response.has_field("password"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_email_registration_is_rejected() -> TestResult {
    let harness = harness().await?;
    let existing = harness.create_test_user(UserOverrides::default().password("TestPassword123!")).await?;
    let payload = registration(
        &harness,
        UserOverrides::default()
            .email(existing.email.clone())
            .password("AnotherPassword123!")
            .names("Duplicate", "User"),
    );

    let response = harness.public_client().post("/usuarios", &payload).await?;

    assert_status_in(&response, harness.expected_statuses().duplicate_email)?;
    assert!(response.message().is_some(), "no error message in {}", response.body);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_email_registration_is_rejected() -> TestResult {
    let harness = harness().await?;
    let payload = registration(
        &harness,
        UserOverrides::default().email("invalid-email").password("ValidPassword123!"),
    );
    let response = harness.public_client().post("/usuarios", &payload).await?;
    assert_status_in(&response, harness.expected_statuses().invalid_email_on_create)?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn weak_password_registration_is_rejected() -> TestResult {
    let harness = harness().await?;
    let payload = registration(&harness, UserOverrides::default().password("123"));
    let response = harness.public_client().post("/usuarios", &payload).await?;
    assert_eq!(response.status, 400);
    Ok(())
}

// ============================================================================
// SECTION: Login
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn login_with_fresh_credentials() -> TestResult {
    let harness = harness().await?;
    let user = harness.create_test_user(UserOverrides::default().password("TestPassword123!")).await?;

    let response = harness
        .public_client()
        .post("/auth/login", &json!({"email": user.email, "password": user.password}))
        .await?;

    assert_status_in(&response, harness.expected_statuses().fresh_user_login)?;
    if response.status == 200 {
        assert!(response.has_field("access_token"));
        assert_eq!(response.body["user"]["email"], user.email.as_str());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn login_with_unknown_email_is_rejected() -> TestResult {
    let harness = harness().await?;
    let response = harness
        .public_client()
        .post("/auth/login", &json!({"email": "nonexistent@streamflow.com", "password": "TestPassword123!"}))
        .await?;
    assert_status_in(&response, harness.expected_statuses().unknown_login)?;
    assert!(response.message().is_some(), "no error message in {}", response.body);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn login_with_wrong_password_is_rejected() -> TestResult {
    let harness = harness().await?;
    let user = harness.create_test_user(UserOverrides::default()).await?;
    let response = harness
        .public_client()
        .post("/auth/login", &json!({"email": user.email, "password": "wrongpassword"}))
        .await?;
    assert_status_in(&response, harness.expected_statuses().unknown_login)?;
    assert!(response.message().is_some(), "no error message in {}", response.body);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn login_without_password_fails_validation() -> TestResult {
    let harness = harness().await?;
    let response = harness
        .public_client()
        .post("/auth/login", &json!({"email": generate_random_email()}))
        .await?;
    assert_status_in(&response, harness.expected_statuses().login_validation_failure)?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn harness_login_failure_names_authentication() -> TestResult {
    let harness = harness().await?;
    let Err(err) = harness.authenticate_user("invalid@streamflow.com", "wrongpassword").await else {
        return Err("unknown credentials were accepted".into());
    };
    assert!(matches!(err, HarnessError::AuthenticationFailed { .. }), "{err}");
    assert!(err.to_string().contains("Authentication failed"));
    Ok(())
}

// ============================================================================
// SECTION: Token Validation
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn valid_token_reads_own_profile() -> TestResult {
    let harness = harness().await?;
    let Some((user, session)) = fresh_user_session(&harness, UserOverrides::default()).await? else {
        return Ok(());
    };
    let response = session.client.get(&format!("/usuarios/{}", session.user_id()?)).await?;
    assert_eq!(response.status, 200);
    assert_eq!(response.str_field("email"), Some(user.email.as_str()));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_and_malformed_tokens_are_rejected() -> TestResult {
    let harness = harness().await?;
    let admin_id = admin_session(&harness).await?.user_id()?;
    for token in ["invalid-token", "expired.token.here"] {
        let client = harness.authenticated_client(token)?;
        let response = client.get(&format!("/usuarios/{admin_id}")).await?;
        assert_eq!(response.status, 401, "token {token} was accepted");
    }
    Ok(())
}

// ============================================================================
// SECTION: Password Management
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn password_change_rotates_credentials() -> TestResult {
    let harness = harness().await?;
    let overrides = UserOverrides::default().password("TestPassword123!");
    let Some((mut user, session)) = fresh_user_session(&harness, overrides).await? else {
        return Ok(());
    };
    let new_password = "NewPassword123!";

    let response = session
        .client
        .patch(
            &format!("/auth/usuarios/{}", session.user_id()?),
            &json!({"current_password": user.password, "new_password": new_password}),
        )
        .await?;
    assert_status_in(&response, &[200, 204])?;
    user.password = new_password.to_string();

    harness.authenticate_user(&user.email, &user.password).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn password_change_requires_current_password() -> TestResult {
    let harness = harness().await?;
    let Some((_, session)) = fresh_user_session(&harness, UserOverrides::default()).await? else {
        return Ok(());
    };
    let response = session
        .client
        .patch(
            &format!("/auth/usuarios/{}", session.user_id()?),
            &json!({"current_password": "wrongcurrentpassword", "new_password": "AnotherNewPassword123!"}),
        )
        .await?;
    assert_eq!(response.status, 400);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn password_change_requires_authentication() -> TestResult {
    let harness = harness().await?;
    let admin_id = admin_session(&harness).await?.user_id()?;
    let response = harness
        .public_client()
        .patch(
            &format!("/auth/usuarios/{admin_id}"),
            &json!({"current_password": "somepassword", "new_password": "AnotherNewPassword123!"}),
        )
        .await?;
    assert_eq!(response.status, 401);
    Ok(())
}

// ============================================================================
// SECTION: Logout
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn logout_invalidates_token() -> TestResult {
    let harness = harness().await?;
    let Some((_, session)) = fresh_user_session(&harness, UserOverrides::default()).await? else {
        return Ok(());
    };
    let logout = session.client.post_empty("/auth/logout").await?;
    assert_status_in(&logout, &[200, 204])?;

    let response = session.client.get(&format!("/usuarios/{}", session.user_id()?)).await?;
    assert_eq!(response.status, 401);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn logout_with_invalid_token_is_rejected() -> TestResult {
    let harness = harness().await?;
    let response = harness.authenticated_client("invalid-token")?.post_empty("/auth/logout").await?;
    assert_eq!(response.status, 401);
    Ok(())
}

// ============================================================================
// SECTION: Admin Authentication
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn admin_session_has_elevated_privileges() -> TestResult {
    let harness = harness().await?;
    let admin = admin_session(&harness).await?;
    assert_eq!(admin.tokens.user_role(), Some(harness.config().deployment.admin_role_label()));
    let response = admin.client.get("/usuarios").await?;
    assert_status_in(&response, &[200, 404])?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn regular_user_cannot_list_users() -> TestResult {
    let harness = harness().await?;
    let Some((_, session)) = fresh_user_session(&harness, UserOverrides::default()).await? else {
        return Ok(());
    };
    let response = session.client.get("/usuarios").await?;
    assert_status_in(&response, &[401, 403])?;
    Ok(())
}

// ============================================================================
// SECTION: Edge Cases
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_logins_each_settle() -> TestResult {
    let harness = harness().await?;
    let user = harness.create_test_user(UserOverrides::default().password("TestPassword123!")).await?;

    let outcomes = fan_out(5, |_| {
        let harness = harness.clone();
        let (email, password) = (user.email.clone(), user.password.clone());
        async move { harness.authenticate_user(&email, &password).await }
    })
    .await;

    assert_eq!(outcomes.len(), 5);
    for outcome in outcomes {
        match outcome {
            Ok(tokens) => assert!(!tokens.access_token.is_empty()),
            Err(HarnessError::AuthenticationFailed {
                status, ..
            }) => assert!(matches!(status, 401 | 429), "unexpected login status {status}"),
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_and_empty_authorization_headers_are_rejected() -> TestResult {
    let harness = harness().await?;
    for authorization in ["InvalidFormat token123", ""] {
        let client = harness.raw_client_with_authorization(authorization)?;
        let response = client.get("/usuarios/1").await?;
        assert_eq!(response.status, 401, "authorization '{authorization}' was accepted");
    }
    Ok(())
}
