//! Reporting queries for the admin dashboard.
//!
//! Revenue counts only orders with a VERIFIED payment. Cost of goods is
//! estimated from each product's latest procurement cost price.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use nabta_core::{ProductId, UserId};

use super::RepositoryError;

/// Order and revenue summary for one month.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub total_orders: i64,
    pub verified_orders: i64,
    pub pending_orders: i64,
    pub rejected_orders: i64,
    pub cancelled_orders: i64,
    pub verified_revenue: Decimal,
    #[sqlx(default)]
    pub new_users: i64,
}

/// A best-selling product.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: ProductId,
    pub name_en: String,
    pub name_ar: String,
    pub image: Option<String>,
    pub total_quantity: i64,
    pub total_revenue: Decimal,
}

/// A highest-spending customer.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TopCustomer {
    pub user_id: UserId,
    pub name: Option<String>,
    pub phone: String,
    pub order_count: i64,
    pub total_spent: Decimal,
}

/// Revenue, estimated cost and profit for one day of the month.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProfitLossDay {
    pub day: i32,
    pub revenue: Decimal,
    pub cost: Decimal,
}

/// Month-long profit/loss view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitLossReport {
    pub days: Vec<ProfitLossDay>,
    pub total_revenue: Decimal,
    pub total_cost: Decimal,
    pub total_profit: Decimal,
    pub procurement_spend: Decimal,
}

/// Sales and procurement figures for a single product.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductReport {
    pub units_sold: i64,
    pub sales_revenue: Decimal,
    pub procured_quantity: i64,
    pub procurement_cost: Decimal,
}

/// Repository for reporting queries.
pub struct ReportRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportRepository<'a> {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Monthly summary for `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn monthly_summary(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<MonthlySummary, RepositoryError> {
        let mut summary = sqlx::query_as::<_, MonthlySummary>(
            r"
            SELECT COUNT(*) AS total_orders,
                   COUNT(*) FILTER (WHERE payment_status = 'VERIFIED') AS verified_orders,
                   COUNT(*) FILTER (WHERE payment_status = 'PENDING') AS pending_orders,
                   COUNT(*) FILTER (WHERE payment_status = 'REJECTED') AS rejected_orders,
                   COUNT(*) FILTER (WHERE status = 'CANCELLED') AS cancelled_orders,
                   COALESCE(SUM(total) FILTER (WHERE payment_status = 'VERIFIED'), 0)
                       AS verified_revenue
            FROM orders
            WHERE created_at >= $1 AND created_at < $2
            ",
        )
        .bind(start)
        .bind(end)
        .fetch_one(self.pool)
        .await?;

        summary.new_users = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(self.pool)
        .await?;

        Ok(summary)
    }

    /// Top ten products by quantity sold across verified orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_products(&self) -> Result<Vec<TopProduct>, RepositoryError> {
        let products = sqlx::query_as::<_, TopProduct>(
            r"
            SELECT p.id AS product_id, p.name_en, p.name_ar, p.image,
                   SUM(i.quantity) AS total_quantity,
                   SUM(i.quantity * i.price) AS total_revenue
            FROM order_items i
            JOIN orders o ON o.id = i.order_id AND o.payment_status = 'VERIFIED'
            JOIN products p ON p.id = i.product_id
            GROUP BY p.id
            ORDER BY total_quantity DESC
            LIMIT 10
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Top ten customers by verified spend.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_customers(&self) -> Result<Vec<TopCustomer>, RepositoryError> {
        let customers = sqlx::query_as::<_, TopCustomer>(
            r"
            SELECT u.id AS user_id, u.name, u.phone,
                   COUNT(o.id) AS order_count,
                   COALESCE(SUM(o.total), 0) AS total_spent
            FROM users u
            JOIN orders o ON o.user_id = u.id AND o.payment_status = 'VERIFIED'
            GROUP BY u.id
            ORDER BY total_spent DESC
            LIMIT 10
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(customers)
    }

    /// Profit/loss per day for `[start, end)`, plus the month's total
    /// procurement spend.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn profit_loss(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ProfitLossReport, RepositoryError> {
        let days = sqlx::query_as::<_, ProfitLossDay>(
            r"
            SELECT day, SUM(revenue) AS revenue, SUM(cost) AS cost
            FROM (
                SELECT CAST(EXTRACT(DAY FROM o.created_at) AS INT) AS day,
                       o.total AS revenue,
                       COALESCE((SELECT SUM(i.quantity * COALESCE(p.cost_price, 0))
                                 FROM order_items i
                                 JOIN products p ON p.id = i.product_id
                                 WHERE i.order_id = o.id), 0) AS cost
                FROM orders o
                WHERE o.created_at >= $1 AND o.created_at < $2
                  AND o.payment_status = 'VERIFIED'
            ) per_order
            GROUP BY day
            ORDER BY day ASC
            ",
        )
        .bind(start)
        .bind(end)
        .fetch_all(self.pool)
        .await?;

        let procurement_spend: Decimal = sqlx::query_scalar(
            r"
            SELECT COALESCE(SUM(total_cost), 0)
            FROM procurements
            WHERE created_at >= $1 AND created_at < $2 AND status <> 'CANCELLED'
            ",
        )
        .bind(start)
        .bind(end)
        .fetch_one(self.pool)
        .await?;

        let total_revenue: Decimal = days.iter().map(|d| d.revenue).sum();
        let total_cost: Decimal = days.iter().map(|d| d.cost).sum();

        Ok(ProfitLossReport {
            total_profit: total_revenue - total_cost,
            total_revenue,
            total_cost,
            days,
            procurement_spend,
        })
    }

    /// Sales and procurement figures for one product, optionally bounded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn product_report(
        &self,
        product_id: ProductId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<ProductReport, RepositoryError> {
        let (units_sold, sales_revenue): (i64, Decimal) = sqlx::query_as(
            r"
            SELECT COALESCE(SUM(i.quantity), 0),
                   COALESCE(SUM(i.quantity * i.price), 0)
            FROM order_items i
            JOIN orders o ON o.id = i.order_id AND o.payment_status = 'VERIFIED'
            WHERE i.product_id = $1
              AND ($2::timestamptz IS NULL OR o.created_at >= $2)
              AND ($3::timestamptz IS NULL OR o.created_at < $3)
            ",
        )
        .bind(product_id)
        .bind(from)
        .bind(to)
        .fetch_one(self.pool)
        .await?;

        let (procured_quantity, procurement_cost): (i64, Decimal) = sqlx::query_as(
            r"
            SELECT COALESCE(SUM(i.quantity), 0),
                   COALESCE(SUM(i.quantity * i.cost_price), 0)
            FROM procurement_items i
            JOIN procurements pr ON pr.id = i.procurement_id AND pr.status <> 'CANCELLED'
            WHERE i.product_id = $1
              AND ($2::timestamptz IS NULL OR pr.created_at >= $2)
              AND ($3::timestamptz IS NULL OR pr.created_at < $3)
            ",
        )
        .bind(product_id)
        .bind(from)
        .bind(to)
        .fetch_one(self.pool)
        .await?;

        Ok(ProductReport {
            units_sold,
            sales_revenue,
            procured_quantity,
            procurement_cost,
        })
    }
}
