//! Site settings endpoints.

use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Deserialize;

use crate::db::SettingsRepository;
use crate::db::settings::SettingsUpdate;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::SiteSettings;
use crate::services::uploads;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub support_phone: Option<String>,
    pub support_email: Option<String>,
    pub support_whatsapp: Option<String>,
    pub support_address_en: Option<String>,
    pub support_address_ar: Option<String>,
    pub working_hours_en: Option<String>,
    pub working_hours_ar: Option<String>,
}

/// `GET /api/settings`
pub async fn get(State(state): State<AppState>) -> Result<Json<SiteSettings>> {
    let settings = SettingsRepository::new(state.pool()).get_or_create().await?;
    Ok(Json(settings))
}

/// `PUT /api/settings`
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<Json<SiteSettings>> {
    let settings = SettingsRepository::new(state.pool())
        .update(SettingsUpdate {
            support_phone: req.support_phone,
            support_email: req.support_email,
            support_whatsapp: req.support_whatsapp,
            support_address_en: req.support_address_en,
            support_address_ar: req.support_address_ar,
            working_hours_en: req.working_hours_en,
            working_hours_ar: req.working_hours_ar,
        })
        .await?;

    Ok(Json(settings))
}

/// `POST /api/settings/banner` (multipart)
pub async fn upload_banner(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SiteSettings>> {
    let form =
        uploads::collect(multipart, &state.config().upload_dir, "banners", "banner").await?;

    let image = form
        .image
        .ok_or_else(|| AppError::BadRequest("banner image is required".to_string()))?;

    let settings = SettingsRepository::new(state.pool())
        .set_banner(&image.public_url)
        .await?;

    Ok(Json(settings))
}
