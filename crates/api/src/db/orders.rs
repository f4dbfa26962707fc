//! Order repository.
//!
//! Order creation is one transaction: product rows are locked, the subtotal
//! and per-item loyalty points are computed, the delivery zone and coupon
//! are applied, an optional loyalty-point spend is deducted, and the order
//! plus its lines are inserted. Status updates award or refund points
//! exactly once, on the first transition into `VERIFIED` or `CANCELLED`.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;

use nabta_core::checkout;
use nabta_core::{OrderId, OrderStatus, PaymentStatus, ProductId, UserId};

use super::RepositoryError;
use crate::models::coupon::Coupon;
use crate::models::{Order, OrderItemWithProduct, OrderWithItems, Product};
use crate::services::reference;

/// Delivery price when no zone matches the shipping address.
const DEFAULT_DELIVERY_PRICE: Decimal = Decimal::from_parts(3000, 0, 0, false, 0);

/// A line in a new order request.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Everything needed to place an order.
#[derive(Debug)]
pub struct NewOrder {
    pub user_id: UserId,
    pub items: Vec<NewOrderItem>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub coupon_code: Option<String>,
    pub use_loyalty_points: bool,
}

/// Optional fields for an order update. `None` leaves a column as-is.
#[derive(Debug, Default)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub payment_proof: Option<String>,
}

/// Errors specific to placing an order.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("product {0} not found")]
    ProductNotFound(i64),

    #[error("order must contain at least one item")]
    EmptyOrder,

    #[error("item quantity must be positive")]
    InvalidQuantity,
}

impl From<sqlx::Error> for OrderError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    #[sqlx(flatten)]
    order: Order,
    customer_name: Option<String>,
    customer_phone: String,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List orders, newest first. `user_id` scopes the list to one customer;
    /// `status` filters by order status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        user_id: Option<UserId>,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT o.id, o.invoice_number, o.user_id, o.subtotal, o.delivery, o.discount,
                   o.total, o.loyalty_points_earned, o.loyalty_points_used, o.status,
                   o.payment_status, o.payment_proof, o.country, o.state, o.address,
                   o.coupon_code, o.created_at, o.updated_at,
                   u.name AS customer_name, u.phone AS customer_phone
            FROM orders o
            JOIN users u ON u.id = o.user_id
            WHERE ($1::bigint IS NULL OR o.user_id = $1)
              AND ($2::order_status IS NULL OR o.status = $2)
            ORDER BY o.created_at DESC
            ",
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(self.pool)
        .await?;

        let order_ids: Vec<i64> = rows.iter().map(|r| i64::from(r.order.id)).collect();
        let mut items_by_order = self.items_for(&order_ids).await?;

        Ok(rows
            .into_iter()
            .map(|r| OrderWithItems {
                items: items_by_order.remove(&r.order.id).unwrap_or_default(),
                order: r.order,
                customer_name: r.customer_name,
                customer_phone: r.customer_phone,
            })
            .collect())
    }

    /// Get a single order with its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<OrderWithItems>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT o.id, o.invoice_number, o.user_id, o.subtotal, o.delivery, o.discount,
                   o.total, o.loyalty_points_earned, o.loyalty_points_used, o.status,
                   o.payment_status, o.payment_proof, o.country, o.state, o.address,
                   o.coupon_code, o.created_at, o.updated_at,
                   u.name AS customer_name, u.phone AS customer_phone
            FROM orders o
            JOIN users u ON u.id = o.user_id
            WHERE o.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut items_by_order = self.items_for(&[i64::from(id)]).await?;

        Ok(Some(OrderWithItems {
            items: items_by_order.remove(&id).unwrap_or_default(),
            order: row.order,
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
        }))
    }

    /// Place an order. Runs as one transaction.
    ///
    /// A coupon that cannot be applied (unknown, inactive, expired, capped
    /// out, or under its minimum purchase) does not block the order: the
    /// discount stays zero and the usage counter is untouched. Rejection
    /// reasons surface at `POST /api/coupons/validate` instead.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::ProductNotFound` if a line names a missing
    /// product and `OrderError::Repository` for database failures.
    pub async fn create(&self, new: NewOrder) -> Result<OrderWithItems, OrderError> {
        if new.items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        if new.items.iter().any(|i| i.quantity <= 0) {
            return Err(OrderError::InvalidQuantity);
        }

        let mut tx = self.pool.begin().await?;

        // Lock the referenced products for a consistent price snapshot.
        let product_ids: Vec<i64> = new.items.iter().map(|i| i64::from(i.product_id)).collect();
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name_en, name_ar, description_en, description_ar, price, cost_price,
                   stock, image, is_new, is_sale, discount, loyalty_points_enabled,
                   loyalty_points_value, category_id, created_at, updated_at
            FROM products
            WHERE id = ANY($1)
            FOR UPDATE
            ",
        )
        .bind(&product_ids)
        .fetch_all(&mut *tx)
        .await?;
        let products: HashMap<ProductId, Product> =
            products.into_iter().map(|p| (p.id, p)).collect();

        let mut subtotal = Decimal::ZERO;
        let mut points_earned = 0_i32;
        for item in &new.items {
            let product = products
                .get(&item.product_id)
                .ok_or(OrderError::ProductNotFound(i64::from(item.product_id)))?;
            subtotal += product.price * Decimal::from(item.quantity);
            if product.loyalty_points_enabled {
                points_earned += product.loyalty_points_value * item.quantity;
            }
        }

        let delivery =
            delivery_price(&mut tx, new.country.as_deref(), new.state.as_deref()).await?;

        // Coupon: applied and counted only when it checks out against the
        // subtotal. An inapplicable coupon is skipped, not an error; the
        // order goes through at full price with the code stored as sent.
        let mut discount = Decimal::ZERO;
        let coupon_code = new
            .coupon_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_owned);
        if let Some(code) = coupon_code.as_deref() {
            let coupon = sqlx::query_as::<_, Coupon>(
                r"
                SELECT id, code, discount_type, discount_value, min_purchase, max_uses,
                       used_count, is_active, expires_at, created_at
                FROM coupons
                WHERE code = UPPER($1)
                FOR UPDATE
                ",
            )
            .bind(code)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(coupon) = coupon {
                if let Ok(applied) =
                    checkout::evaluate_coupon(&coupon.terms(), subtotal, Utc::now())
                {
                    discount = applied;
                    sqlx::query("UPDATE coupons SET used_count = used_count + 1 WHERE id = $1")
                        .bind(coupon.id)
                        .execute(&mut *tx)
                        .await?;
                }
            }
        }

        // Loyalty spend: capped at the amount still payable.
        let mut points_used = 0_i32;
        if new.use_loyalty_points {
            let available: i32 = sqlx::query_scalar(
                "SELECT loyalty_points FROM users WHERE id = $1 FOR UPDATE",
            )
            .bind(new.user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound)?;

            let payable = subtotal + delivery - discount;
            points_used = checkout::loyalty_points_to_spend(available, payable);
            if points_used > 0 {
                sqlx::query("UPDATE users SET loyalty_points = loyalty_points - $2 WHERE id = $1")
                    .bind(new.user_id)
                    .bind(points_used)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        RepositoryError::on_check(e, "loyalty points cannot go negative")
                    })?;
            }
        }

        let total = checkout::order_total(subtotal, delivery, discount, points_used);

        let order = sqlx::query_as::<_, Order>(
            r"
            INSERT INTO orders (invoice_number, user_id, subtotal, delivery, discount, total,
                                loyalty_points_earned, loyalty_points_used,
                                country, state, address, coupon_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, invoice_number, user_id, subtotal, delivery, discount, total,
                      loyalty_points_earned, loyalty_points_used, status, payment_status,
                      payment_proof, country, state, address, coupon_code,
                      created_at, updated_at
            ",
        )
        .bind(reference::invoice_number())
        .bind(new.user_id)
        .bind(subtotal)
        .bind(delivery)
        .bind(discount)
        .bind(total)
        .bind(points_earned)
        .bind(points_used)
        .bind(&new.country)
        .bind(&new.state)
        .bind(&new.address)
        .bind(&coupon_code)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(new.items.len());
        for item in &new.items {
            // Presence was checked when computing the subtotal.
            let Some(product) = products.get(&item.product_id) else {
                continue;
            };
            let line_points = if product.loyalty_points_enabled {
                product.loyalty_points_value * item.quantity
            } else {
                0
            };

            let item_id = sqlx::query_scalar(
                r"
                INSERT INTO order_items (order_id, product_id, quantity, price,
                                         loyalty_points_earned)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                ",
            )
            .bind(order.id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(product.price)
            .bind(line_points)
            .fetch_one(&mut *tx)
            .await?;

            items.push(OrderItemWithProduct {
                id: item_id,
                order_id: order.id,
                product_id: item.product_id,
                quantity: item.quantity,
                price: product.price,
                loyalty_points_earned: line_points,
                product_name_en: product.name_en.clone(),
                product_name_ar: product.name_ar.clone(),
                product_image: product.image.clone(),
            });
        }

        let (customer_name, customer_phone): (Option<String>, String) =
            sqlx::query_as("SELECT name, phone FROM users WHERE id = $1")
                .bind(new.user_id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;

        Ok(OrderWithItems {
            order,
            items,
            customer_name,
            customer_phone,
        })
    }

    /// Update an order's status, payment status, or payment proof.
    ///
    /// Awards earned points on the first transition to `VERIFIED` and
    /// refunds used points on the first transition to `CANCELLED`, in the
    /// same transaction as the status write.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn update(
        &self,
        id: OrderId,
        update: OrderUpdate,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Order>(
            r"
            SELECT id, invoice_number, user_id, subtotal, delivery, discount, total,
                   loyalty_points_earned, loyalty_points_used, status, payment_status,
                   payment_proof, country, state, address, coupon_code,
                   created_at, updated_at
            FROM orders
            WHERE id = $1
            FOR UPDATE
            ",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        // Award earned points exactly once, when payment first verifies.
        if update.payment_status == Some(PaymentStatus::Verified)
            && current.payment_status != PaymentStatus::Verified
            && current.loyalty_points_earned > 0
        {
            sqlx::query("UPDATE users SET loyalty_points = loyalty_points + $2 WHERE id = $1")
                .bind(current.user_id)
                .bind(current.loyalty_points_earned)
                .execute(&mut *tx)
                .await?;
        }

        // Refund spent points exactly once, on the first cancellation.
        if update.status == Some(OrderStatus::Cancelled)
            && current.status != OrderStatus::Cancelled
            && current.loyalty_points_used > 0
        {
            sqlx::query("UPDATE users SET loyalty_points = loyalty_points + $2 WHERE id = $1")
                .bind(current.user_id)
                .bind(current.loyalty_points_used)
                .execute(&mut *tx)
                .await?;
        }

        let order = sqlx::query_as::<_, Order>(
            r"
            UPDATE orders
            SET status = COALESCE($2, status),
                payment_status = COALESCE($3, payment_status),
                payment_proof = COALESCE($4, payment_proof),
                updated_at = now()
            WHERE id = $1
            RETURNING id, invoice_number, user_id, subtotal, delivery, discount, total,
                      loyalty_points_earned, loyalty_points_used, status, payment_status,
                      payment_proof, country, state, address, coupon_code,
                      created_at, updated_at
            ",
        )
        .bind(id)
        .bind(update.status)
        .bind(update.payment_status)
        .bind(update.payment_proof)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(order)
    }

    /// Fetch order lines (with product names) for a set of order ids,
    /// grouped by order.
    async fn items_for(
        &self,
        order_ids: &[i64],
    ) -> Result<HashMap<OrderId, Vec<OrderItemWithProduct>>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let items = sqlx::query_as::<_, OrderItemWithProduct>(
            r"
            SELECT i.id, i.order_id, i.product_id, i.quantity, i.price,
                   i.loyalty_points_earned,
                   p.name_en AS product_name_en, p.name_ar AS product_name_ar,
                   p.image AS product_image
            FROM order_items i
            JOIN products p ON p.id = i.product_id
            WHERE i.order_id = ANY($1)
            ORDER BY i.id ASC
            ",
        )
        .bind(order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_order: HashMap<OrderId, Vec<OrderItemWithProduct>> = HashMap::new();
        for item in items {
            by_order.entry(item.order_id).or_default().push(item);
        }

        Ok(by_order)
    }
}

/// Delivery price for a shipping address: the active zone's price, the
/// default when an address is given but no zone matches, and zero when the
/// address has no country/state to look up.
async fn delivery_price(
    tx: &mut Transaction<'_, Postgres>,
    country: Option<&str>,
    state: Option<&str>,
) -> Result<Decimal, RepositoryError> {
    let (Some(country), Some(state)) = (country, state) else {
        return Ok(Decimal::ZERO);
    };

    let price: Option<Decimal> = sqlx::query_scalar(
        r"
        SELECT price FROM delivery_zones
        WHERE LOWER(country) = LOWER($1) AND LOWER(state) = LOWER($2) AND is_active
        ",
    )
    .bind(country)
    .bind(state)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(price.unwrap_or(DEFAULT_DELIVERY_PRICE))
}
