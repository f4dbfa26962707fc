//! Procurement endpoints (admin only).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use nabta_core::{ProcurementId, ProcurementStatus, ProductId};

use crate::db::ProcurementRepository;
use crate::db::procurements::{NewProcurement, NewProcurementItem};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Procurement, ProcurementWithItems};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcurementItemRequest {
    pub product_id: ProductId,
    pub quantity: i32,
    pub cost_price: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProcurementRequest {
    pub supplier: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<ProcurementItemRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProcurementRequest {
    pub supplier: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<ProcurementItemRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub status: ProcurementStatus,
}

/// `GET /api/procurement`
pub async fn list(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProcurementWithItems>>> {
    let procurements = ProcurementRepository::new(state.pool()).list().await?;
    Ok(Json(procurements))
}

/// `GET /api/procurement/{id}`
pub async fn get(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProcurementId>,
) -> Result<Json<ProcurementWithItems>> {
    let procurement = ProcurementRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("procurement not found".to_string()))?;
    Ok(Json(procurement))
}

/// `POST /api/procurement`
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(req): Json<CreateProcurementRequest>,
) -> Result<(StatusCode, Json<ProcurementWithItems>)> {
    let items = validate_items(req.items)?;

    let procurement = ProcurementRepository::new(state.pool())
        .create(NewProcurement {
            supplier: req.supplier,
            notes: req.notes,
            items,
            created_by: Some(admin.id),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(procurement)))
}

/// `PUT /api/procurement/{id}`
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProcurementId>,
    Json(req): Json<UpdateProcurementRequest>,
) -> Result<Json<ProcurementWithItems>> {
    let items = validate_items(req.items)?;

    let procurement = ProcurementRepository::new(state.pool())
        .update(id, req.supplier, req.notes, items)
        .await?;

    Ok(Json(procurement))
}

/// `PUT /api/procurement/{id}/status`
pub async fn set_status(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProcurementId>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<Procurement>> {
    let procurement = ProcurementRepository::new(state.pool())
        .set_status(id, req.status)
        .await?;
    Ok(Json(procurement))
}

/// Check the lines and convert them into repository inputs.
fn validate_items(items: Vec<ProcurementItemRequest>) -> Result<Vec<NewProcurementItem>> {
    if items.is_empty() {
        return Err(AppError::BadRequest(
            "procurement must contain at least one item".to_string(),
        ));
    }
    if items.iter().any(|i| i.quantity <= 0) {
        return Err(AppError::BadRequest(
            "item quantity must be positive".to_string(),
        ));
    }
    if items.iter().any(|i| i.cost_price < Decimal::ZERO) {
        return Err(AppError::BadRequest(
            "cost price cannot be negative".to_string(),
        ));
    }

    Ok(items
        .into_iter()
        .map(|i| NewProcurementItem {
            product_id: i.product_id,
            quantity: i.quantity,
            cost_price: i.cost_price,
        })
        .collect())
}
