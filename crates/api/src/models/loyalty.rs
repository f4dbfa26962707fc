//! Loyalty shop models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use nabta_core::{LoyaltyProductId, ProductId, RedemptionId, RedemptionStatus, UserId};

/// Singleton loyalty programme configuration.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltySettings {
    pub id: i64,
    pub min_points_to_unlock: i32,
    pub points_per_currency: i32,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyProduct {
    pub id: LoyaltyProductId,
    pub product_id: ProductId,
    pub points_required: i32,
    pub stock_limit: Option<i32>,
    pub stock_used: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Loyalty shop listing row joined with the underlying product.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyProductWithProduct {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub loyalty_product: LoyaltyProduct,
    pub product_name_en: String,
    pub product_name_ar: String,
    pub product_image: Option<String>,
    pub product_price: Decimal,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyRedemption {
    pub id: RedemptionId,
    pub user_id: UserId,
    pub loyalty_product_id: LoyaltyProductId,
    pub points_spent: i32,
    pub quantity: i32,
    pub status: RedemptionStatus,
    pub country: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Redemption row for admin and customer listings.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionWithDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub redemption: LoyaltyRedemption,
    pub product_name_en: String,
    pub product_name_ar: String,
    pub product_image: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: String,
}
