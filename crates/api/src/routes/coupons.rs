//! Coupon endpoints.
//!
//! Validation is public so the cart can price a code before checkout; the
//! authoritative check (and use counting) happens again when the order is
//! placed.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use nabta_core::checkout;
use nabta_core::{CouponId, DiscountType};

use crate::db::CouponRepository;
use crate::db::coupons::CouponUpdate;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Coupon;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCouponRequest {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_purchase: Option<Decimal>,
    pub max_uses: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCouponRequest {
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<Decimal>,
    pub min_purchase: Option<Decimal>,
    pub max_uses: Option<i32>,
    pub is_active: Option<bool>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCouponRequest {
    pub code: String,
    pub subtotal: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCouponResponse {
    pub code: String,
    pub discount: Decimal,
}

/// `GET /api/coupons`
pub async fn list(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Coupon>>> {
    let coupons = CouponRepository::new(state.pool()).list().await?;
    Ok(Json(coupons))
}

/// `POST /api/coupons`
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Json(req): Json<CreateCouponRequest>,
) -> Result<(StatusCode, Json<Coupon>)> {
    if req.code.trim().is_empty() {
        return Err(AppError::BadRequest("coupon code is required".to_string()));
    }

    let coupon = CouponRepository::new(state.pool())
        .create(
            &req.code,
            req.discount_type,
            req.discount_value,
            req.min_purchase,
            req.max_uses,
            req.expires_at,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(coupon)))
}

/// `POST /api/coupons/validate`
pub async fn validate(
    State(state): State<AppState>,
    Json(req): Json<ValidateCouponRequest>,
) -> Result<Json<ValidateCouponResponse>> {
    let coupon = CouponRepository::new(state.pool())
        .get_by_code(&req.code)
        .await?
        .ok_or_else(|| AppError::BadRequest("invalid coupon code".to_string()))?;

    let discount = checkout::evaluate_coupon(&coupon.terms(), req.subtotal, Utc::now())?;

    Ok(Json(ValidateCouponResponse {
        code: coupon.code,
        discount,
    }))
}

/// `PUT /api/coupons/{id}`
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<CouponId>,
    Json(req): Json<UpdateCouponRequest>,
) -> Result<Json<Coupon>> {
    let coupon = CouponRepository::new(state.pool())
        .update(
            id,
            CouponUpdate {
                discount_type: req.discount_type,
                discount_value: req.discount_value,
                min_purchase: req.min_purchase,
                max_uses: req.max_uses,
                is_active: req.is_active,
                expires_at: req.expires_at,
            },
        )
        .await?;

    Ok(Json(coupon))
}

/// `DELETE /api/coupons/{id}`
pub async fn remove(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<CouponId>,
) -> Result<Json<Value>> {
    let deleted = CouponRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("coupon not found".to_string()));
    }
    Ok(Json(json!({ "deleted": true })))
}
