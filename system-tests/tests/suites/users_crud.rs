// system-tests/tests/suites/users_crud.rs
// ============================================================================
// Module: Users CRUD Tests
// Description: Login plus create/read/update/list/delete on /usuarios.
// Purpose: Walk the user lifecycle through the gateway as an admin.
// Dependencies: streamflow-system-tests, serde_json
// ============================================================================

//! ## Overview
//! Login plus create/read/update/list/delete on `/usuarios`, each operation
//! with its success case and its rejection cases. Every test creates the
//! users it touches, so tests run independently and in any order.

#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Test names describe the scenario under test."
)]

use serde_json::Value;
use serde_json::json;
use streamflow_system_tests::HarnessError;
use streamflow_system_tests::Role;
use streamflow_system_tests::TestUser;
use streamflow_system_tests::UserOverrides;
use streamflow_system_tests::assert_response;
use streamflow_system_tests::assert_status_in;
use streamflow_system_tests::deployment::NameStyle;
use streamflow_system_tests::extract_collection;
use streamflow_system_tests::fixtures::id_from_body;
use streamflow_system_tests::generate_random_email;

use crate::helpers::sessions::NON_EXISTENT_USER_ID;
use crate::helpers::sessions::admin_session;
use crate::helpers::sessions::created_id;
use crate::helpers::sessions::fresh_user_session;
use crate::helpers::sessions::user_path;
use crate::helpers::setup::TestResult;
use crate::helpers::setup::harness;

// ============================================================================
// SECTION: POST /auth/login
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn admin_login_reports_admin_identity() -> TestResult {
    let harness = harness().await?;
    let config = harness.config();
    let tokens = harness.authenticate_user(&config.admin_email, &config.admin_password).await?;
    assert!(!tokens.access_token.is_empty());
    assert_eq!(tokens.user_email(), Some(config.admin_email.as_str()));
    assert_eq!(tokens.user_role(), Some(config.deployment.admin_role_label()));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_credentials_raise_authentication_failure() -> TestResult {
    let harness = harness().await?;
    match harness.authenticate_user("invalid@streamflow.com", "wrongpassword").await {
        Err(err @ HarnessError::AuthenticationFailed { .. }) => {
            assert!(err.to_string().contains("Authentication failed"));
            Ok(())
        }
        Err(err) => Err(err.into()),
        Ok(_) => Err("invalid credentials were accepted".into()),
    }
}

// ============================================================================
// SECTION: POST /usuarios
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn create_user_returns_public_record() -> TestResult {
    let harness = harness().await?;
    let user = TestUser::from_overrides(
        UserOverrides::default().password("E2ETest123!").names("E2E", "Test User"),
    );
    let payload = user.creation_payload(harness.config().deployment.name_style());

    let response = harness.public_client().post("/usuarios", &payload).await?;

    assert_status_in(&response, &[200, 201])?;
    assert!(id_from_body(&response.body).is_some(), "no id in {}", response.body);
    assert_eq!(response.str_field("email"), Some(user.email.as_str()));
    assert_eq!(response.str_field("role"), Some(Role::StandardUser.as_str()));
    assert!(!response.has_field("password"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn create_user_rejects_duplicate_email() -> TestResult {
    let harness = harness().await?;
    let existing = harness.create_test_user(UserOverrides::default()).await?;
    let duplicate = TestUser::from_overrides(
        UserOverrides::default()
            .email(existing.email)
            .password("AnotherPassword123!")
            .names("Duplicate", "User"),
    );

    let response = harness
        .public_client()
        .post("/usuarios", &duplicate.creation_payload(harness.config().deployment.name_style()))
        .await?;

    assert_status_in(&response, harness.expected_statuses().duplicate_email)?;
    assert!(response.message().is_some(), "no error message in {}", response.body);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn create_user_rejects_invalid_email() -> TestResult {
    let harness = harness().await?;
    let invalid = TestUser::from_overrides(
        UserOverrides::default().email("invalid-email-format").names("Invalid", "Email User"),
    );
    let response = harness
        .public_client()
        .post("/usuarios", &invalid.creation_payload(harness.config().deployment.name_style()))
        .await?;
    assert_status_in(&response, harness.expected_statuses().invalid_email_on_create)?;
    Ok(())
}

// ============================================================================
// SECTION: GET /usuarios/{id}
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn get_user_by_id() -> TestResult {
    let harness = harness().await?;
    let admin = admin_session(&harness).await?;
    let user = harness.create_test_user(UserOverrides::default()).await?;
    let id = created_id(&user)?;

    let body = assert_response(&admin.client.get(&user_path(&id)).await?, 200, Some("reading created user"))?;

    assert_eq!(id_from_body(&body), Some(id));
    assert_eq!(body["email"], user.email.as_str());
    match harness.config().deployment.name_style() {
        NameStyle::FirstLast => {
            assert!(body.get("first_name").is_some(), "no first_name in {body}");
            assert!(body.get("last_name").is_some(), "no last_name in {body}");
        }
        NameStyle::Single => assert!(body.get("name").is_some(), "no name in {body}"),
    }
    assert!(body.get("role").is_some());
    assert!(body.get("password").is_none());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn get_unknown_user_is_not_found() -> TestResult {
    let harness = harness().await?;
    let admin = admin_session(&harness).await?;
    let response = admin.client.get(&user_path(NON_EXISTENT_USER_ID)).await?;
    assert_eq!(response.status, 404);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn get_user_requires_authentication() -> TestResult {
    let harness = harness().await?;
    let user = harness.create_test_user(UserOverrides::default()).await?;
    let response = harness.public_client().get(&user_path(&created_id(&user)?)).await?;
    assert_eq!(response.status, 401);
    Ok(())
}

// ============================================================================
// SECTION: PATCH /usuarios/{id}
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn update_user_changes_names() -> TestResult {
    let harness = harness().await?;
    let admin = admin_session(&harness).await?;
    let user = harness.create_test_user(UserOverrides::default()).await?;
    let path = user_path(&created_id(&user)?);
    let update = Value::Object(harness.config().deployment.name_style().name_fields("Updated E2E", "Test User"));

    let response = admin.client.patch(&path, &update).await?;
    assert_status_in(&response, &[200, 204])?;

    let body = assert_response(&admin.client.get(&path).await?, 200, None)?;
    for (field, expected) in update.as_object().into_iter().flatten() {
        assert_eq!(&body[field], expected, "field {field} was not updated");
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn update_unknown_user_is_not_found() -> TestResult {
    let harness = harness().await?;
    let admin = admin_session(&harness).await?;
    let response =
        admin.client.patch(&user_path(NON_EXISTENT_USER_ID), &json!({"name": "Should not work"})).await?;
    assert_eq!(response.status, 404);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn update_rejects_invalid_email() -> TestResult {
    let harness = harness().await?;
    let admin = admin_session(&harness).await?;
    let user = harness.create_test_user(UserOverrides::default()).await?;
    let response = admin
        .client
        .patch(&user_path(&created_id(&user)?), &json!({"email": "invalid-email-format"}))
        .await?;
    assert_eq!(response.status, 400);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn update_requires_authentication() -> TestResult {
    let harness = harness().await?;
    let user = harness.create_test_user(UserOverrides::default()).await?;
    let response = harness
        .public_client()
        .patch(&user_path(&created_id(&user)?), &json!({"name": "Unauthorized update"}))
        .await?;
    assert_eq!(response.status, 401);
    Ok(())
}

// ============================================================================
// SECTION: GET /usuarios
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn admin_lists_users_without_passwords() -> TestResult {
    let harness = harness().await?;
    let admin = admin_session(&harness).await?;
    harness.create_test_user(UserOverrides::default()).await?;

    let body = assert_response(&admin.client.get("/usuarios").await?, 200, Some("listing users"))?;
    let users = extract_collection(&body).ok_or_else(|| format!("no user collection in {body}"))?;

    assert!(!users.is_empty());
    for user in users {
        assert!(user.get("password").is_none(), "password leaked in {user}");
        assert!(user.get("role").is_some(), "no role in {user}");
        if let Some(email) = user.get("email").filter(|email| !email.is_null()) {
            assert!(email.is_string(), "non-string email in {user}");
        }
    }
    let admin_email = admin.tokens.user_email().unwrap_or_default();
    if let Some(listed_admin) = users.iter().find(|user| user["email"] == admin_email) {
        assert_eq!(listed_admin["role"], harness.config().deployment.admin_role_label());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn list_users_requires_authentication() -> TestResult {
    let harness = harness().await?;
    let response = harness.public_client().get("/usuarios").await?;
    assert_eq!(response.status, 401);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn list_users_forbidden_for_regular_user() -> TestResult {
    let harness = harness().await?;
    let overrides = UserOverrides::default().password("E2ETest123!");
    let Some((_, session)) = fresh_user_session(&harness, overrides).await? else {
        return Ok(());
    };
    let response = session.client.get("/usuarios").await?;
    assert_status_in(&response, &[401, 403])?;
    Ok(())
}

// ============================================================================
// SECTION: DELETE /usuarios/{id}
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn delete_user_removes_record() -> TestResult {
    let harness = harness().await?;
    let admin = admin_session(&harness).await?;
    let user = harness.create_test_user(UserOverrides::default()).await?;
    let path = user_path(&created_id(&user)?);

    assert_status_in(&admin.client.delete(&path).await?, &[200, 204])?;
    assert_status_in(&admin.client.get(&path).await?, &[404, 410])?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_unknown_user_is_not_found() -> TestResult {
    let harness = harness().await?;
    let admin = admin_session(&harness).await?;
    let response = admin.client.delete(&user_path(NON_EXISTENT_USER_ID)).await?;
    assert_eq!(response.status, 404);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_requires_authentication() -> TestResult {
    let harness = harness().await?;
    let user = harness.create_test_user(UserOverrides::default().email(generate_random_email())).await?;
    let response = harness.public_client().delete(&user_path(&created_id(&user)?)).await?;
    assert_eq!(response.status, 401);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn deleted_user_cannot_log_in() -> TestResult {
    let harness = harness().await?;
    let admin = admin_session(&harness).await?;
    let user = harness.create_test_user(UserOverrides::default().password("E2ETest123!")).await?;
    assert_status_in(&admin.client.delete(&user_path(&created_id(&user)?)).await?, &[200, 204])?;

    match harness.authenticate_user(&user.email, &user.password).await {
        Err(HarnessError::AuthenticationFailed { .. }) => Ok(()),
        Err(err) => Err(err.into()),
        Ok(_) => Err("deleted user could still log in".into()),
    }
}
