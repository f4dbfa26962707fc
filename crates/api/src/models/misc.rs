//! Delivery zones, messages, bank accounts, support entries, site settings
//! and product recipes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use nabta_core::{
    BankAccountId, DeliveryZoneId, MessageId, ProductId, RecipeId, SupportInfoId, UserId,
};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryZone {
    pub id: DeliveryZoneId,
    pub country: String,
    pub state: String,
    pub price: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub subject: String,
    pub content: String,
    pub sender_id: Option<UserId>,
    pub receiver_id: Option<UserId>,
    pub is_broadcast: bool,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub sender_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub id: BankAccountId,
    pub bank_name_en: String,
    pub bank_name_ar: String,
    pub account_name: String,
    pub account_number: String,
    pub branch_en: Option<String>,
    pub branch_ar: Option<String>,
    pub image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SupportInfo {
    pub id: SupportInfoId,
    pub title_en: String,
    pub title_ar: String,
    pub content_en: String,
    pub content_ar: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Singleton site-wide settings row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub id: i64,
    pub support_phone: Option<String>,
    pub support_email: Option<String>,
    pub support_whatsapp: Option<String>,
    pub support_address_en: Option<String>,
    pub support_address_ar: Option<String>,
    pub working_hours_en: Option<String>,
    pub working_hours_ar: Option<String>,
    pub banner_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecipe {
    pub id: RecipeId,
    pub product_id: ProductId,
    pub recipe_name_en: String,
    pub recipe_name_ar: String,
    pub description_en: Option<String>,
    pub description_ar: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
