//! User management (admin) and self-service profile updates.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use nabta_core::{Phone, Role, UserId};

use crate::db::users::{UserRepository, UserUpdate};
use crate::db::{OrderRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{OrderWithItems, User, UserWithOrderCount};
use crate::services::auth::hash_password;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub phone: String,
    pub password: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub loyalty_points: Option<i32>,
    pub is_active: Option<bool>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyAdjustment {
    pub points: i32,
}

/// `GET /api/users`
pub async fn list(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserWithOrderCount>>> {
    let users = UserRepository::new(state.pool())
        .list_with_order_counts()
        .await?;
    Ok(Json(users))
}

/// `POST /api/users`
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let phone =
        Phone::parse(&req.phone).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let password_hash = hash_password(&req.password)?;

    let user = UserRepository::new(state.pool())
        .create_with_role(
            &phone,
            &password_hash,
            req.name.as_deref(),
            req.email.as_deref(),
            req.role.unwrap_or_default(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// `PUT /api/users/profile`
pub async fn update_profile(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<User>> {
    let user = UserRepository::new(state.pool())
        .update_profile(
            user.id,
            req.name.as_deref(),
            req.email.as_deref(),
            req.country.as_deref(),
            req.state.as_deref(),
            req.address.as_deref(),
        )
        .await?;

    Ok(Json(user))
}

/// `GET /api/users/{id}`
pub async fn get(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<User>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;
    Ok(Json(user))
}

/// `PUT /api/users/{id}`
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>> {
    let password_hash = match req.password.as_deref() {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let user = UserRepository::new(state.pool())
        .update(
            id,
            UserUpdate {
                name: req.name,
                email: req.email,
                password_hash,
                role: req.role,
                loyalty_points: req.loyalty_points,
                is_active: req.is_active,
                country: req.country,
                state: req.state,
                address: req.address,
            },
        )
        .await?;

    Ok(Json(user))
}

/// `DELETE /api/users/{id}`
///
/// Admins cannot delete their own account.
pub async fn remove(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<Value>> {
    if admin.id == id {
        return Err(AppError::BadRequest(
            "cannot delete your own account".to_string(),
        ));
    }

    let deleted = UserRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(RepositoryError::NotFound.into());
    }

    Ok(Json(json!({ "deleted": true })))
}

/// `PUT /api/users/{id}/loyalty`
pub async fn add_loyalty_points(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(req): Json<LoyaltyAdjustment>,
) -> Result<Json<User>> {
    let user = UserRepository::new(state.pool())
        .add_loyalty_points(id, req.points)
        .await?;
    Ok(Json(user))
}

/// `GET /api/users/{id}/orders`
pub async fn orders(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<Vec<OrderWithItems>>> {
    let orders = OrderRepository::new(state.pool())
        .list(Some(id), None)
        .await?;
    Ok(Json(orders))
}
