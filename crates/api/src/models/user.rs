//! User account models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use nabta_core::{Role, UserId};

/// A user account. The password hash never leaves the repository layer.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub phone: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Role,
    pub loyalty_points: i32,
    pub country: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User row for the admin list view, with the number of orders placed.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserWithOrderCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub user: User,
    pub order_count: i64,
}
