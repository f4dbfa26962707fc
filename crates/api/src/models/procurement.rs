//! Procurement (purchase order) models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use nabta_core::{ProcurementId, ProcurementItemId, ProcurementStatus, ProductId, UserId};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Procurement {
    pub id: ProcurementId,
    pub order_number: String,
    pub supplier: Option<String>,
    pub notes: Option<String>,
    pub total_cost: Decimal,
    pub status: ProcurementStatus,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Procurement line joined with the product it restocks.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProcurementItemWithProduct {
    pub id: ProcurementItemId,
    pub procurement_id: ProcurementId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub cost_price: Decimal,
    pub product_name_en: String,
    pub product_name_ar: String,
}

/// Full procurement response with its lines.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcurementWithItems {
    #[serde(flatten)]
    pub procurement: Procurement,
    pub items: Vec<ProcurementItemWithProduct>,
}
