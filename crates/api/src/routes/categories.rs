//! Category endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use nabta_core::CategoryId;

use crate::db::CategoryRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Category, CategoryWithCount, CategoryWithProducts};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name_en: String,
    pub name_ar: String,
    pub description: Option<String>,
    pub parent_id: Option<CategoryId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    pub name_en: Option<String>,
    pub name_ar: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<CategoryId>,
}

/// `GET /api/categories`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CategoryWithCount>>> {
    let categories = CategoryRepository::new(state.pool())
        .list_with_counts()
        .await?;
    Ok(Json(categories))
}

/// `GET /api/categories/{id}`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Json<CategoryWithProducts>> {
    let repo = CategoryRepository::new(state.pool());

    let category = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("category not found".to_string()))?;
    let products = repo.products(id).await?;

    Ok(Json(CategoryWithProducts { category, products }))
}

/// `POST /api/categories`
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>)> {
    let category = CategoryRepository::new(state.pool())
        .create(
            &req.name_en,
            &req.name_ar,
            req.description.as_deref(),
            req.parent_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// `PUT /api/categories/{id}`
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>> {
    let category = CategoryRepository::new(state.pool())
        .update(
            id,
            req.name_en.as_deref(),
            req.name_ar.as_deref(),
            req.description.as_deref(),
            req.parent_id,
        )
        .await?;

    Ok(Json(category))
}

/// `DELETE /api/categories/{id}`
pub async fn remove(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Json<Value>> {
    let deleted = CategoryRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("category not found".to_string()));
    }
    Ok(Json(json!({ "deleted": true })))
}
