//! Integration tests for procurement-driven stock changes.
//!
//! These tests require:
//! - A running `PostgreSQL` database (migrated)
//! - The API server running (cargo run -p nabta-api)
//! - An admin account (`nabta-cli admin create`), exposed via the
//!   `ADMIN_PHONE` / `ADMIN_PASSWORD` environment variables
//!
//! Run with: cargo test -p nabta-integration-tests -- --ignored

use nabta_integration_tests::{admin_token, base_url, client, create_test_product};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

async fn product_stock(client: &Client, product_id: &Value) -> i64 {
    let base_url = base_url();
    let resp = client
        .get(format!("{base_url}/api/products/{product_id}"))
        .send()
        .await
        .expect("Failed to fetch product");
    assert_eq!(resp.status(), StatusCode::OK);

    let product: Value = resp.json().await.expect("Failed to parse response");
    product["stock"].as_i64().expect("stock should be a number")
}

#[tokio::test]
#[ignore = "Requires running API server, database, and admin credentials"]
async fn test_procurement_applies_stock_exactly() {
    let client = client();
    let base_url = base_url();
    let Some(admin) = admin_token(&client).await else {
        return; // No admin account in this environment
    };

    // New products start with zero stock
    let product = create_test_product(&client, &admin, "1500", 0).await;
    assert_eq!(product_stock(&client, &product["id"]).await, 0);

    let resp = client
        .post(format!("{base_url}/api/procurement"))
        .bearer_auth(&admin)
        .json(&json!({
            "supplier": "Integration Supplier",
            "items": [{"productId": product["id"], "quantity": 7, "costPrice": "800"}],
        }))
        .send()
        .await
        .expect("Failed to create procurement");

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(product_stock(&client, &product["id"]).await, 7);
}

#[tokio::test]
#[ignore = "Requires running API server, database, and admin credentials"]
async fn test_procurement_edit_reverses_old_quantities() {
    let client = client();
    let base_url = base_url();
    let Some(admin) = admin_token(&client).await else {
        return;
    };

    let product = create_test_product(&client, &admin, "1500", 0).await;

    let resp = client
        .post(format!("{base_url}/api/procurement"))
        .bearer_auth(&admin)
        .json(&json!({
            "items": [{"productId": product["id"], "quantity": 10, "costPrice": "800"}],
        }))
        .send()
        .await
        .expect("Failed to create procurement");
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(product_stock(&client, &product["id"]).await, 10);

    let procurement: Value = resp.json().await.expect("Failed to parse response");
    let procurement_id = procurement["id"]
        .as_i64()
        .expect("procurement should have an id");

    // Editing the lines reverses the old quantities before applying the
    // new ones, so the stock ends at exactly the edited amount
    let resp = client
        .put(format!("{base_url}/api/procurement/{procurement_id}"))
        .bearer_auth(&admin)
        .json(&json!({
            "items": [{"productId": product["id"], "quantity": 3, "costPrice": "800"}],
        }))
        .send()
        .await
        .expect("Failed to update procurement");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(product_stock(&client, &product["id"]).await, 3);
}
