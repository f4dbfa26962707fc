//! Product recipe endpoints.
//!
//! Recipes are usage guides for raw ingredients (how to prepare a clay
//! mask, a hibiscus rinse). Reads are public; management is admin-only.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use nabta_core::{ProductId, RecipeId};

use crate::db::RecipeRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Product, ProductRecipe};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeRequest {
    pub product_id: ProductId,
    pub recipe_name_en: String,
    pub recipe_name_ar: String,
    pub description_en: Option<String>,
    pub description_ar: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipeRequest {
    pub recipe_name_en: Option<String>,
    pub recipe_name_ar: Option<String>,
    pub description_en: Option<String>,
    pub description_ar: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

/// `GET /api/recipes` (admin: all recipes, active or not)
pub async fn list(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductRecipe>>> {
    let recipes = RecipeRepository::new(state.pool()).list().await?;
    Ok(Json(recipes))
}

/// `GET /api/recipes/products`
pub async fn products_with_recipes(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>> {
    let products = RecipeRepository::new(state.pool())
        .products_with_recipes()
        .await?;
    Ok(Json(products))
}

/// `GET /api/recipes/product/{id}`
pub async fn for_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Vec<ProductRecipe>>> {
    let recipes = RecipeRepository::new(state.pool()).for_product(id).await?;
    Ok(Json(recipes))
}

/// `GET /api/recipes/product/{id}/exists`
pub async fn has_recipes(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>> {
    let exists = RecipeRepository::new(state.pool()).has_recipes(id).await?;
    Ok(Json(json!({ "hasRecipes": exists })))
}

/// `POST /api/recipes`
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Json(req): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<ProductRecipe>)> {
    let recipe = RecipeRepository::new(state.pool())
        .create(
            req.product_id,
            &req.recipe_name_en,
            &req.recipe_name_ar,
            req.description_en.as_deref(),
            req.description_ar.as_deref(),
            req.image_url.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

/// `PUT /api/recipes/{id}`
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<RecipeId>,
    Json(req): Json<UpdateRecipeRequest>,
) -> Result<Json<ProductRecipe>> {
    let recipe = RecipeRepository::new(state.pool())
        .update(
            id,
            req.recipe_name_en.as_deref(),
            req.recipe_name_ar.as_deref(),
            req.description_en.as_deref(),
            req.description_ar.as_deref(),
            req.image_url.as_deref(),
            req.is_active,
        )
        .await?;

    Ok(Json(recipe))
}

/// `DELETE /api/recipes/{id}`
pub async fn remove(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<RecipeId>,
) -> Result<Json<Value>> {
    let deleted = RecipeRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("recipe not found".to_string()));
    }
    Ok(Json(json!({ "deleted": true })))
}
