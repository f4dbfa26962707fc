//! Bank account endpoints.
//!
//! Customers pay by bank transfer, so the active accounts are public.
//! Admin create/update accept a multipart form with an optional account
//! image (QR code or card photo). Deletion only deactivates.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use nabta_core::BankAccountId;

use crate::db::BankAccountRepository;
use crate::db::bank_accounts::BankAccountUpdate;
use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, RequireAdmin};
use crate::models::BankAccount;
use crate::services::uploads::{self, MultipartForm};
use crate::state::AppState;

/// `GET /api/bank-accounts`
///
/// Public callers see active accounts; admins see everything.
pub async fn list(
    OptionalAuth(user): OptionalAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<BankAccount>>> {
    let include_inactive = user.is_some_and(|u| u.role.is_admin());
    let accounts = BankAccountRepository::new(state.pool())
        .list(include_inactive)
        .await?;
    Ok(Json(accounts))
}

/// `POST /api/bank-accounts` (multipart)
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<BankAccount>)> {
    let form =
        uploads::collect(multipart, &state.config().upload_dir, "bank-accounts", "bank").await?;

    let account = BankAccountRepository::new(state.pool())
        .create(
            required(&form, "bankNameEn")?,
            required(&form, "bankNameAr")?,
            required(&form, "accountName")?,
            required(&form, "accountNumber")?,
            form.text("branchEn"),
            form.text("branchAr"),
            form.image.as_ref().map(|i| i.public_url.as_str()),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// `PUT /api/bank-accounts/{id}` (multipart)
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<BankAccountId>,
    multipart: Multipart,
) -> Result<Json<BankAccount>> {
    let form =
        uploads::collect(multipart, &state.config().upload_dir, "bank-accounts", "bank").await?;

    let is_active = match form.text("isActive").filter(|v| !v.trim().is_empty()) {
        Some("true" | "1") => Some(true),
        Some("false" | "0") => Some(false),
        Some(_) => {
            return Err(AppError::BadRequest("isActive must be a boolean".to_string()));
        }
        None => None,
    };

    let account = BankAccountRepository::new(state.pool())
        .update(
            id,
            BankAccountUpdate {
                bank_name_en: form.text("bankNameEn").map(ToString::to_string),
                bank_name_ar: form.text("bankNameAr").map(ToString::to_string),
                account_name: form.text("accountName").map(ToString::to_string),
                account_number: form.text("accountNumber").map(ToString::to_string),
                branch_en: form.text("branchEn").map(ToString::to_string),
                branch_ar: form.text("branchAr").map(ToString::to_string),
                image: form.image.as_ref().map(|i| i.public_url.clone()),
                is_active,
            },
        )
        .await?;

    Ok(Json(account))
}

/// `DELETE /api/bank-accounts/{id}` (soft delete)
pub async fn remove(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<BankAccountId>,
) -> Result<Json<Value>> {
    BankAccountRepository::new(state.pool()).deactivate(id).await?;
    Ok(Json(json!({ "deleted": true })))
}

fn required<'a>(form: &'a MultipartForm, name: &str) -> Result<&'a str> {
    form.text(name)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{name} is required")))
}
