//! Delivery zone endpoints.
//!
//! The price lookup is public so the cart can show delivery cost before
//! checkout. Addresses with no matching zone fall back to the default price,
//! mirroring what order creation charges.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use nabta_core::DeliveryZoneId;

use crate::db::DeliveryZoneRepository;
use crate::error::Result;
use crate::middleware::{OptionalAuth, RequireAdmin};
use crate::models::DeliveryZone;
use crate::state::AppState;

/// Matches the fallback used by order creation.
const DEFAULT_DELIVERY_PRICE: Decimal = Decimal::from_parts(3000, 0, 0, false, 0);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuery {
    pub country: String,
    pub state: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    pub price: Decimal,
    pub zone_matched: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateZoneRequest {
    pub country: String,
    pub state: String,
    pub price: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateZoneRequest {
    pub price: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// `GET /api/delivery-zones`
///
/// Public callers see active zones; admins see everything.
pub async fn list(
    OptionalAuth(user): OptionalAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<DeliveryZone>>> {
    let include_inactive = user.is_some_and(|u| u.role.is_admin());
    let zones = DeliveryZoneRepository::new(state.pool())
        .list(include_inactive)
        .await?;
    Ok(Json(zones))
}

/// `GET /api/delivery-zones/price`
pub async fn price(
    State(state): State<AppState>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<PriceResponse>> {
    let price = DeliveryZoneRepository::new(state.pool())
        .price_for(&query.country, &query.state)
        .await?;

    Ok(Json(PriceResponse {
        zone_matched: price.is_some(),
        price: price.unwrap_or(DEFAULT_DELIVERY_PRICE),
    }))
}

/// `POST /api/delivery-zones`
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Json(req): Json<CreateZoneRequest>,
) -> Result<(StatusCode, Json<DeliveryZone>)> {
    let zone = DeliveryZoneRepository::new(state.pool())
        .create(&req.country, &req.state, req.price)
        .await?;
    Ok((StatusCode::CREATED, Json(zone)))
}

/// `PUT /api/delivery-zones/{id}`
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DeliveryZoneId>,
    Json(req): Json<UpdateZoneRequest>,
) -> Result<Json<DeliveryZone>> {
    let zone = DeliveryZoneRepository::new(state.pool())
        .update(id, req.price, req.is_active)
        .await?;
    Ok(Json(zone))
}
