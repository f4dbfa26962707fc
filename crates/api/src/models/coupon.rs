//! Coupon model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use nabta_core::checkout::CouponTerms;
use nabta_core::{CouponId, DiscountType};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: CouponId,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_purchase: Option<Decimal>,
    pub max_uses: Option<i32>,
    pub used_count: i32,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Coupon {
    /// The validation-relevant fields, for the pure checkout arithmetic.
    #[must_use]
    pub fn terms(&self) -> CouponTerms {
        CouponTerms {
            discount_type: self.discount_type,
            discount_value: self.discount_value,
            min_purchase: self.min_purchase,
            max_uses: self.max_uses,
            used_count: self.used_count,
            is_active: self.is_active,
            expires_at: self.expires_at,
        }
    }
}
