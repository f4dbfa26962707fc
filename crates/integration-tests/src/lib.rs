//! Integration tests for the Nabta API.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! docker compose up -d db
//! cargo run -p nabta-cli -- migrate
//!
//! # Start the API server
//! cargo run -p nabta-api
//!
//! # Run integration tests (ignored by default)
//! cargo test -p nabta-integration-tests -- --ignored
//! ```
//!
//! Tests talk to a running server over HTTP; set `API_BASE_URL` to point
//! them at a non-default address.

use reqwest::Client;
use reqwest::multipart::Form;
use rust_decimal::Decimal;
use serde_json::{Value, json};

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// A plain HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// Generate a unique Sudanese phone number for test registration.
///
/// Uses the local `09XXXXXXXX` form with random digits so repeated runs
/// do not collide on the phone unique constraint.
#[must_use]
pub fn unique_phone() -> String {
    let digits = uuid::Uuid::new_v4().as_u128() % 100_000_000;
    format!("09{digits:08}")
}

/// Register a fresh test user and return `(token, user)`.
///
/// # Panics
///
/// Panics if registration fails or the response is malformed.
pub async fn register_test_user(client: &Client) -> (String, Value) {
    let base_url = base_url();
    let phone = unique_phone();

    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "phone": phone,
            "password": "integration-test-password",
            "name": "Integration Test",
        }))
        .send()
        .await
        .expect("Failed to register test user");

    assert_eq!(resp.status(), 201, "registration should succeed");

    let body: Value = resp.json().await.expect("Failed to parse response");
    let token = body["token"]
        .as_str()
        .expect("response should contain a token")
        .to_string();
    let user = body["user"].clone();
    (token, user)
}

/// Log in as the admin account created via `nabta-cli admin create`.
///
/// Reads `ADMIN_PHONE` / `ADMIN_PASSWORD`; returns `None` when they are not
/// set or the login fails, so admin-only tests can skip in environments
/// without an admin account.
pub async fn admin_token(client: &Client) -> Option<String> {
    let phone = std::env::var("ADMIN_PHONE").ok()?;
    let password = std::env::var("ADMIN_PASSWORD").ok()?;

    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({"phone": phone, "password": password}))
        .send()
        .await
        .ok()?;
    if resp.status() != 200 {
        return None;
    }

    let body: Value = resp.json().await.ok()?;
    body["token"].as_str().map(ToString::to_string)
}

/// Create a product through the admin multipart endpoint.
///
/// `loyalty_points_value` of zero creates a product with loyalty points
/// disabled.
///
/// # Panics
///
/// Panics if creation fails or the response is malformed.
pub async fn create_test_product(
    client: &Client,
    admin_token: &str,
    price: &str,
    loyalty_points_value: i32,
) -> Value {
    let form = Form::new()
        .text("nameEn", format!("Integration Product {}", uuid::Uuid::new_v4()))
        .text("nameAr", "منتج اختبار")
        .text("price", price.to_string())
        .text(
            "loyaltyPointsEnabled",
            if loyalty_points_value > 0 { "true" } else { "false" },
        )
        .text("loyaltyPointsValue", loyalty_points_value.to_string());

    let resp = client
        .post(format!("{}/api/products", base_url()))
        .bearer_auth(admin_token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to create test product");

    assert_eq!(resp.status(), 201, "product creation should succeed");
    resp.json().await.expect("Failed to parse response")
}

/// Read a money field, which the API serialises as a decimal string.
///
/// # Panics
///
/// Panics if the field is missing or not a decimal string.
#[must_use]
pub fn money(value: &Value, key: &str) -> Decimal {
    value[key]
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| panic!("{key} should be a decimal string, got {:?}", value[key]))
}
