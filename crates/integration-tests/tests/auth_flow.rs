//! Integration tests for registration, login, and token auth.
//!
//! These tests require:
//! - A running `PostgreSQL` database (migrated)
//! - The API server running (cargo run -p nabta-api)
//!
//! Run with: cargo test -p nabta-integration-tests -- --ignored

use nabta_integration_tests::{base_url, client, register_test_user, unique_phone};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_register_login_me_flow() {
    let client = client();
    let base_url = base_url();
    let phone = unique_phone();

    // Register
    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "phone": phone,
            "password": "integration-test-password",
            "name": "Flow Test",
        }))
        .send()
        .await
        .expect("Failed to register");

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    // Phone is normalised to international form regardless of input format
    assert!(
        body["user"]["phone"]
            .as_str()
            .is_some_and(|p| p.starts_with("+249"))
    );

    // Login with the same credentials
    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({
            "phone": phone,
            "password": "integration-test-password",
        }))
        .send()
        .await
        .expect("Failed to login");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    let token = body["token"].as_str().expect("login should return a token");

    // Fetch the current user with the token
    let resp = client
        .get(format!("{base_url}/api/auth/me"))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to get current user");

    assert_eq!(resp.status(), StatusCode::OK);
    let me: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(me["name"], json!("Flow Test"));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_duplicate_phone_rejected() {
    let client = client();
    let base_url = base_url();
    let phone = unique_phone();

    let register = json!({
        "phone": phone,
        "password": "integration-test-password",
    });

    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&register)
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Second registration with the same phone must fail
    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&register)
        .send()
        .await
        .expect("Failed to attempt duplicate registration");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert!(body["error"].is_string());
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_wrong_password_rejected() {
    let client = client();
    let base_url = base_url();
    let (_, user) = register_test_user(&client).await;

    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({
            "phone": user["phone"],
            "password": "not-the-password",
        }))
        .send()
        .await
        .expect("Failed to attempt login");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_invalid_phone_rejected() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "phone": "+1555123456",
            "password": "integration-test-password",
        }))
        .send()
        .await
        .expect("Failed to attempt registration");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_missing_token_rejected() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/api/auth/me"))
        .send()
        .await
        .expect("Failed to reach endpoint");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
