//! Support info endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use nabta_core::SupportInfoId;

use crate::db::SupportRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::SupportInfo;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupportRequest {
    pub title_en: String,
    pub title_ar: String,
    pub content_en: String,
    pub content_ar: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSupportRequest {
    pub title_en: Option<String>,
    pub title_ar: Option<String>,
    pub content_en: Option<String>,
    pub content_ar: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// `GET /api/support`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<SupportInfo>>> {
    let entries = SupportRepository::new(state.pool()).list().await?;
    Ok(Json(entries))
}

/// `POST /api/support`
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Json(req): Json<CreateSupportRequest>,
) -> Result<(StatusCode, Json<SupportInfo>)> {
    let entry = SupportRepository::new(state.pool())
        .create(
            &req.title_en,
            &req.title_ar,
            &req.content_en,
            &req.content_ar,
            req.phone.as_deref(),
            req.email.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

/// `PUT /api/support/{id}`
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<SupportInfoId>,
    Json(req): Json<UpdateSupportRequest>,
) -> Result<Json<SupportInfo>> {
    let entry = SupportRepository::new(state.pool())
        .update(
            id,
            req.title_en.as_deref(),
            req.title_ar.as_deref(),
            req.content_en.as_deref(),
            req.content_ar.as_deref(),
            req.phone.as_deref(),
            req.email.as_deref(),
        )
        .await?;

    Ok(Json(entry))
}

/// `DELETE /api/support/{id}`
pub async fn remove(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<SupportInfoId>,
) -> Result<Json<Value>> {
    let deleted = SupportRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("support entry not found".to_string()));
    }
    Ok(Json(json!({ "deleted": true })))
}
