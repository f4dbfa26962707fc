//! Loyalty shop endpoints.
//!
//! The shop unlocks once a customer has accumulated the configured minimum
//! number of points. Redeeming and browsing the redeemable catalogue both
//! sit behind that gate; the settings themselves are public so the
//! storefront can show how far a customer is from unlocking it.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use nabta_core::{LoyaltyProductId, ProductId, RedemptionId, RedemptionStatus};

use crate::db::LoyaltyRepository;
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{
    LoyaltyProduct, LoyaltyProductWithProduct, LoyaltyRedemption, LoyaltySettings, Product,
    RedemptionWithDetails, User,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub min_points_to_unlock: Option<i32>,
    pub points_per_currency: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessResponse {
    pub unlocked: bool,
    pub points: i32,
    pub points_needed: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductRequest {
    pub product_id: ProductId,
    pub points_required: i32,
    pub stock_limit: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub points_required: Option<i32>,
    pub stock_limit: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    pub loyalty_product_id: LoyaltyProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    pub country: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
}

const fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionFilter {
    pub status: Option<RedemptionStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionStatusRequest {
    pub status: RedemptionStatus,
}

/// `GET /api/loyalty-shop/settings`
pub async fn settings(State(state): State<AppState>) -> Result<Json<LoyaltySettings>> {
    let settings = LoyaltyRepository::new(state.pool()).settings().await?;
    Ok(Json(settings))
}

/// `PUT /api/loyalty-shop/settings`
pub async fn update_settings(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<Json<LoyaltySettings>> {
    let settings = LoyaltyRepository::new(state.pool())
        .update_settings(req.min_points_to_unlock, req.points_per_currency)
        .await?;
    Ok(Json(settings))
}

/// `GET /api/loyalty-shop/access`
pub async fn access(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<AccessResponse>> {
    let settings = LoyaltyRepository::new(state.pool()).settings().await?;
    let needed = (settings.min_points_to_unlock - user.loyalty_points).max(0);

    Ok(Json(AccessResponse {
        unlocked: needed == 0,
        points: user.loyalty_points,
        points_needed: needed,
    }))
}

/// `GET /api/loyalty-shop/products`
pub async fn products(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<LoyaltyProductWithProduct>>> {
    let repo = LoyaltyRepository::new(state.pool());
    ensure_unlocked(&repo, &user).await?;

    let products = repo.list_products(false).await?;
    Ok(Json(products))
}

/// `POST /api/loyalty-shop/products`
pub async fn add_product(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Json(req): Json<AddProductRequest>,
) -> Result<(StatusCode, Json<LoyaltyProduct>)> {
    if req.points_required <= 0 {
        return Err(AppError::BadRequest(
            "points required must be positive".to_string(),
        ));
    }

    let product = LoyaltyRepository::new(state.pool())
        .add_product(req.product_id, req.points_required, req.stock_limit)
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/loyalty-shop/products/{id}`
pub async fn update_product(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<LoyaltyProductId>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<LoyaltyProduct>> {
    let product = LoyaltyRepository::new(state.pool())
        .update_product(id, req.points_required, req.stock_limit, req.is_active)
        .await?;
    Ok(Json(product))
}

/// `DELETE /api/loyalty-shop/products/{id}`
pub async fn remove_product(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<LoyaltyProductId>,
) -> Result<Json<Value>> {
    let removed = LoyaltyRepository::new(state.pool()).remove_product(id).await?;
    if !removed {
        return Err(AppError::NotFound("loyalty product not found".to_string()));
    }
    Ok(Json(json!({ "deleted": true })))
}

/// `GET /api/loyalty-shop/available-products`
pub async fn available_products(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>> {
    let products = LoyaltyRepository::new(state.pool())
        .available_products()
        .await?;
    Ok(Json(products))
}

/// `POST /api/loyalty-shop/redeem`
pub async fn redeem(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(req): Json<RedeemRequest>,
) -> Result<(StatusCode, Json<LoyaltyRedemption>)> {
    let repo = LoyaltyRepository::new(state.pool());
    ensure_unlocked(&repo, &user).await?;

    let redemption = repo
        .redeem(
            user.id,
            req.loyalty_product_id,
            req.quantity,
            req.country.as_deref().or(user.country.as_deref()),
            req.state.as_deref().or(user.state.as_deref()),
            req.address.as_deref().or(user.address.as_deref()),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(redemption)))
}

/// `GET /api/loyalty-shop/my-redemptions`
pub async fn my_redemptions(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<RedemptionWithDetails>>> {
    let redemptions = LoyaltyRepository::new(state.pool())
        .redemptions_for_user(user.id)
        .await?;
    Ok(Json(redemptions))
}

/// `GET /api/loyalty-shop/redemptions`
pub async fn redemptions(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Query(filter): Query<RedemptionFilter>,
) -> Result<Json<Vec<RedemptionWithDetails>>> {
    let redemptions = LoyaltyRepository::new(state.pool())
        .list_redemptions(filter.status)
        .await?;
    Ok(Json(redemptions))
}

/// `PUT /api/loyalty-shop/redemptions/{id}/status`
pub async fn update_redemption_status(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<RedemptionId>,
    Json(req): Json<RedemptionStatusRequest>,
) -> Result<Json<LoyaltyRedemption>> {
    let redemption = LoyaltyRepository::new(state.pool())
        .set_redemption_status(id, req.status)
        .await?;
    Ok(Json(redemption))
}

/// Reject customers who haven't reached the unlock threshold yet.
async fn ensure_unlocked(repo: &LoyaltyRepository<'_>, user: &User) -> Result<()> {
    let settings = repo.settings().await?;
    if user.loyalty_points < settings.min_points_to_unlock {
        return Err(AppError::Forbidden(format!(
            "loyalty shop unlocks at {} points",
            settings.min_points_to_unlock
        )));
    }
    Ok(())
}
