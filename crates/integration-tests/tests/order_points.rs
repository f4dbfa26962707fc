//! Integration tests for loyalty point awards and refunds on order updates.
//!
//! These tests require:
//! - A running `PostgreSQL` database (migrated)
//! - The API server running (cargo run -p nabta-api)
//! - An admin account (`nabta-cli admin create`), exposed via the
//!   `ADMIN_PHONE` / `ADMIN_PASSWORD` environment variables
//!
//! Run with: cargo test -p nabta-integration-tests -- --ignored

use nabta_integration_tests::{admin_token, base_url, client, create_test_product, register_test_user};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

async fn current_points(client: &Client, token: &str) -> i64 {
    let base_url = base_url();
    let resp = client
        .get(format!("{base_url}/api/auth/me"))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to get current user");
    assert_eq!(resp.status(), StatusCode::OK);

    let me: Value = resp.json().await.expect("Failed to parse response");
    me["loyaltyPoints"]
        .as_i64()
        .expect("loyaltyPoints should be a number")
}

async fn place_order(client: &Client, token: &str, body: &Value) -> Value {
    let base_url = base_url();
    let resp = client
        .post(format!("{base_url}/api/orders"))
        .bearer_auth(token)
        .json(body)
        .send()
        .await
        .expect("Failed to create order");
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse response")
}

async fn admin_update_order(client: &Client, admin: &str, order_id: i64, body: &Value) {
    let base_url = base_url();
    let resp = client
        .put(format!("{base_url}/api/orders/{order_id}"))
        .bearer_auth(admin)
        .json(body)
        .send()
        .await
        .expect("Failed to update order");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API server, database, and admin credentials"]
async fn test_verified_payment_awards_points_once() {
    let client = client();
    let Some(admin) = admin_token(&client).await else {
        return; // No admin account in this environment
    };

    // 5 points per unit, two units -> 10 points earned
    let product = create_test_product(&client, &admin, "1000", 5).await;
    let (token, _) = register_test_user(&client).await;

    let order = place_order(
        &client,
        &token,
        &json!({"items": [{"productId": product["id"], "quantity": 2}]}),
    )
    .await;
    assert_eq!(order["loyaltyPointsEarned"], json!(10));
    assert_eq!(current_points(&client, &token).await, 0);

    let order_id = order["id"].as_i64().expect("order should have an id");
    admin_update_order(&client, &admin, order_id, &json!({"paymentStatus": "VERIFIED"})).await;
    assert_eq!(current_points(&client, &token).await, 10);

    // Re-verifying must not award the points again
    admin_update_order(&client, &admin, order_id, &json!({"paymentStatus": "VERIFIED"})).await;
    assert_eq!(current_points(&client, &token).await, 10);
}

#[tokio::test]
#[ignore = "Requires running API server, database, and admin credentials"]
async fn test_cancellation_refunds_spent_points_once() {
    let client = client();
    let Some(admin) = admin_token(&client).await else {
        return;
    };

    let product = create_test_product(&client, &admin, "1000", 5).await;
    let (token, _) = register_test_user(&client).await;

    // Earn 10 points through a verified order
    let order = place_order(
        &client,
        &token,
        &json!({"items": [{"productId": product["id"], "quantity": 2}]}),
    )
    .await;
    let order_id = order["id"].as_i64().expect("order should have an id");
    admin_update_order(&client, &admin, order_id, &json!({"paymentStatus": "VERIFIED"})).await;
    assert_eq!(current_points(&client, &token).await, 10);

    // Spend them on the next order
    let order = place_order(
        &client,
        &token,
        &json!({
            "items": [{"productId": product["id"], "quantity": 1}],
            "useLoyaltyPoints": true,
        }),
    )
    .await;
    assert_eq!(order["loyaltyPointsUsed"], json!(10));
    assert_eq!(current_points(&client, &token).await, 0);

    // Cancelling refunds exactly what was spent
    let order_id = order["id"].as_i64().expect("order should have an id");
    admin_update_order(&client, &admin, order_id, &json!({"status": "CANCELLED"})).await;
    assert_eq!(current_points(&client, &token).await, 10);

    // A second cancellation must not refund again
    admin_update_order(&client, &admin, order_id, &json!({"status": "CANCELLED"})).await;
    assert_eq!(current_points(&client, &token).await, 10);
}
