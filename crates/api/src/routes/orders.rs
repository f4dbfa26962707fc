//! Order endpoints.
//!
//! Customers see only their own orders; admins see everything and drive
//! the status lifecycle. A customer's only write after placing an order is
//! attaching a payment proof to it.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use nabta_core::{OrderId, OrderStatus, PaymentStatus, ProductId};

use crate::db::OrderRepository;
use crate::db::orders::{NewOrder, NewOrderItem, OrderUpdate};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Order, OrderWithItems};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub use_loyalty_points: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub payment_proof: Option<String>,
}

/// `GET /api/orders`
///
/// Admins get every order (optionally filtered by status); everyone else
/// gets their own.
pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<Vec<OrderWithItems>>> {
    let scope = if user.role.is_admin() {
        None
    } else {
        Some(user.id)
    };

    let orders = OrderRepository::new(state.pool())
        .list(scope, filter.status)
        .await?;
    Ok(Json(orders))
}

/// `GET /api/orders/{id}`
pub async fn get(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderWithItems>> {
    let order = OrderRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("order not found".to_string()))?;

    if !user.role.is_admin() && order.order.user_id != user.id {
        return Err(AppError::Forbidden("not your order".to_string()));
    }

    Ok(Json(order))
}

/// `POST /api/orders`
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderWithItems>)> {
    let items = req
        .items
        .into_iter()
        .map(|i| NewOrderItem {
            product_id: i.product_id,
            quantity: i.quantity,
        })
        .collect();

    let order = OrderRepository::new(state.pool())
        .create(NewOrder {
            user_id: user.id,
            items,
            country: req.country.or(user.country),
            state: req.state.or(user.state),
            address: req.address.or(user.address),
            coupon_code: req.coupon_code,
            use_loyalty_points: req.use_loyalty_points,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// `PUT /api/orders/{id}`
///
/// Admins may change status, payment status, and payment proof. The order's
/// owner may only attach a payment proof.
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<Order>> {
    let repo = OrderRepository::new(state.pool());

    let update = if user.role.is_admin() {
        OrderUpdate {
            status: req.status,
            payment_status: req.payment_status,
            payment_proof: req.payment_proof,
        }
    } else {
        let existing = repo
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("order not found".to_string()))?;
        if existing.order.user_id != user.id {
            return Err(AppError::Forbidden("not your order".to_string()));
        }
        if req.status.is_some() || req.payment_status.is_some() {
            return Err(AppError::Forbidden(
                "only the payment proof can be changed".to_string(),
            ));
        }
        OrderUpdate {
            status: None,
            payment_status: None,
            payment_proof: req.payment_proof,
        }
    };

    let order = repo.update(id, update).await?;

    Ok(Json(order))
}
