//! Order models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use nabta_core::{OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId, UserId};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub invoice_number: String,
    pub user_id: UserId,
    pub subtotal: Decimal,
    pub delivery: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub loyalty_points_earned: i32,
    pub loyalty_points_used: i32,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_proof: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub coupon_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order line joined with the product it refers to.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemWithProduct {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
    pub loyalty_points_earned: i32,
    pub product_name_en: String,
    pub product_name_ar: String,
    pub product_image: Option<String>,
}

/// Full order response: the order, its lines, and who placed it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemWithProduct>,
    pub customer_name: Option<String>,
    pub customer_phone: String,
}
