//! Product catalog endpoints.
//!
//! Admin create/update accept a multipart form (text fields plus an
//! optional image) so the dashboard can upload product photos in the same
//! request. Field names are camelCase, matching the JSON surface.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use nabta_core::{CategoryId, ProductId};

use crate::db::products::{NewProduct, ProductRepository, ProductUpdate};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Product;
use crate::services::uploads::{self, MultipartForm};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    pub category_id: Option<CategoryId>,
    pub search: Option<String>,
}

/// `GET /api/products`
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool())
        .list(filter.category_id, filter.search.as_deref())
        .await?;
    Ok(Json(products))
}

/// `GET /api/products/{id}`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_string()))?;
    Ok(Json(product))
}

/// `POST /api/products` (multipart)
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Product>)> {
    let form =
        uploads::collect(multipart, &state.config().upload_dir, "products", "product").await?;

    let new = NewProduct {
        name_en: required(&form, "nameEn")?.to_string(),
        name_ar: required(&form, "nameAr")?.to_string(),
        description_en: form.text("descriptionEn").map(ToString::to_string),
        description_ar: form.text("descriptionAr").map(ToString::to_string),
        price: parse_decimal(&form, "price")?
            .ok_or_else(|| AppError::BadRequest("price is required".to_string()))?,
        cost_price: parse_decimal(&form, "costPrice")?,
        image: form.image.as_ref().map(|i| i.public_url.clone()),
        is_new: parse_bool(&form, "isNew")?.unwrap_or(false),
        is_sale: parse_bool(&form, "isSale")?.unwrap_or(false),
        discount: parse_decimal(&form, "discount")?,
        loyalty_points_enabled: parse_bool(&form, "loyaltyPointsEnabled")?.unwrap_or(false),
        loyalty_points_value: parse_i32(&form, "loyaltyPointsValue")?.unwrap_or(0),
        category_id: parse_i64(&form, "categoryId")?.map(CategoryId::from),
    };

    let product = ProductRepository::new(state.pool()).create(new).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/products/{id}` (multipart)
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    multipart: Multipart,
) -> Result<Json<Product>> {
    let form =
        uploads::collect(multipart, &state.config().upload_dir, "products", "product").await?;

    let update = ProductUpdate {
        name_en: form.text("nameEn").map(ToString::to_string),
        name_ar: form.text("nameAr").map(ToString::to_string),
        description_en: form.text("descriptionEn").map(ToString::to_string),
        description_ar: form.text("descriptionAr").map(ToString::to_string),
        price: parse_decimal(&form, "price")?,
        cost_price: parse_decimal(&form, "costPrice")?,
        image: form.image.as_ref().map(|i| i.public_url.clone()),
        is_new: parse_bool(&form, "isNew")?,
        is_sale: parse_bool(&form, "isSale")?,
        discount: parse_decimal(&form, "discount")?,
        loyalty_points_enabled: parse_bool(&form, "loyaltyPointsEnabled")?,
        loyalty_points_value: parse_i32(&form, "loyaltyPointsValue")?,
        category_id: parse_i64(&form, "categoryId")?.map(CategoryId::from),
    };

    let product = ProductRepository::new(state.pool()).update(id, update).await?;

    Ok(Json(product))
}

/// `DELETE /api/products/{id}`
pub async fn remove(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>> {
    let deleted = ProductRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("product not found".to_string()));
    }
    Ok(Json(json!({ "deleted": true })))
}

fn required<'a>(form: &'a MultipartForm, name: &str) -> Result<&'a str> {
    form.text(name)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{name} is required")))
}

fn parse_decimal(form: &MultipartForm, name: &str) -> Result<Option<Decimal>> {
    form.text(name)
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            v.trim()
                .parse::<Decimal>()
                .map_err(|_| AppError::BadRequest(format!("{name} must be a number")))
        })
        .transpose()
}

fn parse_bool(form: &MultipartForm, name: &str) -> Result<Option<bool>> {
    form.text(name)
        .filter(|v| !v.trim().is_empty())
        .map(|v| match v.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(AppError::BadRequest(format!("{name} must be a boolean"))),
        })
        .transpose()
}

fn parse_i32(form: &MultipartForm, name: &str) -> Result<Option<i32>> {
    form.text(name)
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            v.trim()
                .parse::<i32>()
                .map_err(|_| AppError::BadRequest(format!("{name} must be an integer")))
        })
        .transpose()
}

fn parse_i64(form: &MultipartForm, name: &str) -> Result<Option<i64>> {
    form.text(name)
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            v.trim()
                .parse::<i64>()
                .map_err(|_| AppError::BadRequest(format!("{name} must be an integer")))
        })
        .transpose()
}
