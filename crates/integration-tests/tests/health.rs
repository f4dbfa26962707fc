//! Integration tests for health and readiness endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - The API server running (cargo run -p nabta-api)
//!
//! Run with: cargo test -p nabta-integration-tests -- --ignored

use nabta_integration_tests::{base_url, client};
use reqwest::StatusCode;

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_health() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to reach health endpoint");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert_eq!(body, "ok");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_readiness_checks_database() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to reach readiness endpoint");

    assert_eq!(resp.status(), StatusCode::OK);
}
