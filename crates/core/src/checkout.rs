//! Checkout arithmetic: coupon discounts and loyalty-point spending.
//!
//! These functions are pure so that the pricing rules can be tested without
//! a database. The order and coupon handlers in `nabta-api` call into here
//! and persist the results inside a transaction.
//!
//! One loyalty point is worth one unit of currency at checkout.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::types::DiscountType;

/// The coupon fields that matter for validation, detached from storage.
#[derive(Debug, Clone)]
pub struct CouponTerms {
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_purchase: Option<Decimal>,
    pub max_uses: Option<i32>,
    pub used_count: i32,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Why a coupon cannot be applied.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CouponRejection {
    #[error("coupon is no longer active")]
    Inactive,
    #[error("coupon has expired")]
    Expired,
    #[error("coupon usage limit reached")]
    UsageLimitReached,
    #[error("minimum purchase of {required} required")]
    MinPurchaseNotMet { required: Decimal },
}

/// Evaluate a coupon against a subtotal.
///
/// Returns the discount amount when the coupon applies.
///
/// # Errors
///
/// Returns a [`CouponRejection`] naming the first failed check, in the same
/// order the checks have always run: active, expiry, usage cap, minimum
/// purchase.
pub fn evaluate_coupon(
    terms: &CouponTerms,
    subtotal: Decimal,
    now: DateTime<Utc>,
) -> Result<Decimal, CouponRejection> {
    if !terms.is_active {
        return Err(CouponRejection::Inactive);
    }

    if let Some(expires_at) = terms.expires_at {
        if expires_at < now {
            return Err(CouponRejection::Expired);
        }
    }

    if let Some(max_uses) = terms.max_uses {
        if terms.used_count >= max_uses {
            return Err(CouponRejection::UsageLimitReached);
        }
    }

    if let Some(min_purchase) = terms.min_purchase {
        if subtotal < min_purchase {
            return Err(CouponRejection::MinPurchaseNotMet {
                required: min_purchase,
            });
        }
    }

    Ok(discount_amount(terms.discount_type, terms.discount_value, subtotal))
}

/// Compute the discount a coupon grants on a subtotal.
#[must_use]
pub fn discount_amount(discount_type: DiscountType, value: Decimal, subtotal: Decimal) -> Decimal {
    match discount_type {
        DiscountType::Percentage => subtotal * value / Decimal::from(100),
        DiscountType::Fixed => value,
    }
}

/// How many loyalty points to spend on an order.
///
/// Spending is capped at the amount payable after delivery and coupon
/// discount, so points can bring the total to zero but never below it.
#[must_use]
pub fn loyalty_points_to_spend(available: i32, payable: Decimal) -> i32 {
    if available <= 0 {
        return 0;
    }
    let cap = payable.max(Decimal::ZERO).floor();
    Decimal::from(available)
        .min(cap)
        .to_i32()
        .unwrap_or(available)
}

/// Final order total, clamped at zero.
#[must_use]
pub fn order_total(
    subtotal: Decimal,
    delivery: Decimal,
    discount: Decimal,
    points_used: i32,
) -> Decimal {
    (subtotal + delivery - discount - Decimal::from(points_used)).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rust_decimal_macros::dec;

    use super::*;

    fn coupon(discount_type: DiscountType, value: Decimal) -> CouponTerms {
        CouponTerms {
            discount_type,
            discount_value: value,
            min_purchase: None,
            max_uses: None,
            used_count: 0,
            is_active: true,
            expires_at: None,
        }
    }

    #[test]
    fn test_percentage_discount() {
        let terms = coupon(DiscountType::Percentage, dec!(10));
        let discount = evaluate_coupon(&terms, dec!(2500), Utc::now()).expect("valid");
        assert_eq!(discount, dec!(250));
    }

    #[test]
    fn test_fixed_discount() {
        let terms = coupon(DiscountType::Fixed, dec!(500));
        let discount = evaluate_coupon(&terms, dec!(2500), Utc::now()).expect("valid");
        assert_eq!(discount, dec!(500));
    }

    #[test]
    fn test_inactive_coupon_rejected() {
        let mut terms = coupon(DiscountType::Fixed, dec!(500));
        terms.is_active = false;
        assert_eq!(
            evaluate_coupon(&terms, dec!(2500), Utc::now()),
            Err(CouponRejection::Inactive)
        );
    }

    #[test]
    fn test_expired_coupon_rejected() {
        let now = Utc::now();
        let mut terms = coupon(DiscountType::Fixed, dec!(500));
        terms.expires_at = Some(now - Duration::days(1));
        assert_eq!(
            evaluate_coupon(&terms, dec!(2500), now),
            Err(CouponRejection::Expired)
        );
    }

    #[test]
    fn test_coupon_valid_until_expiry() {
        let now = Utc::now();
        let mut terms = coupon(DiscountType::Fixed, dec!(500));
        terms.expires_at = Some(now + Duration::hours(1));
        assert!(evaluate_coupon(&terms, dec!(2500), now).is_ok());
    }

    #[test]
    fn test_usage_cap_honoured() {
        let mut terms = coupon(DiscountType::Fixed, dec!(500));
        terms.max_uses = Some(3);
        terms.used_count = 3;
        assert_eq!(
            evaluate_coupon(&terms, dec!(2500), Utc::now()),
            Err(CouponRejection::UsageLimitReached)
        );

        terms.used_count = 2;
        assert!(evaluate_coupon(&terms, dec!(2500), Utc::now()).is_ok());
    }

    #[test]
    fn test_min_purchase_honoured() {
        let mut terms = coupon(DiscountType::Percentage, dec!(10));
        terms.min_purchase = Some(dec!(1000));
        assert_eq!(
            evaluate_coupon(&terms, dec!(999), Utc::now()),
            Err(CouponRejection::MinPurchaseNotMet {
                required: dec!(1000)
            })
        );
        assert!(evaluate_coupon(&terms, dec!(1000), Utc::now()).is_ok());
    }

    #[test]
    fn test_loyalty_spend_capped_at_payable() {
        assert_eq!(loyalty_points_to_spend(5000, dec!(1200)), 1200);
        assert_eq!(loyalty_points_to_spend(800, dec!(1200)), 800);
        assert_eq!(loyalty_points_to_spend(800, dec!(1200.75)), 800);
    }

    #[test]
    fn test_loyalty_spend_never_negative() {
        assert_eq!(loyalty_points_to_spend(0, dec!(1200)), 0);
        assert_eq!(loyalty_points_to_spend(-5, dec!(1200)), 0);
        assert_eq!(loyalty_points_to_spend(500, dec!(-10)), 0);
    }

    #[test]
    fn test_loyalty_spend_fractional_payable_floors() {
        assert_eq!(loyalty_points_to_spend(5000, dec!(1200.99)), 1200);
    }

    #[test]
    fn test_order_total_clamped_at_zero() {
        assert_eq!(order_total(dec!(1000), dec!(3000), dec!(500), 5000), dec!(0));
    }

    #[test]
    fn test_order_total_arithmetic() {
        assert_eq!(
            order_total(dec!(2500), dec!(3000), dec!(250), 1000),
            dec!(4250)
        );
    }
}
