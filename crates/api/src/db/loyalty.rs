//! Loyalty shop repository: settings, redeemable products, redemptions.
//!
//! A redemption moves points from the user to the shop and consumes
//! redeemable stock; cancelling one puts both back. Each runs as a single
//! transaction.

use sqlx::PgPool;
use thiserror::Error;

use nabta_core::{LoyaltyProductId, ProductId, RedemptionId, RedemptionStatus, UserId};

use super::RepositoryError;
use crate::models::{
    LoyaltyProduct, LoyaltyProductWithProduct, LoyaltyRedemption, LoyaltySettings, Product,
    RedemptionWithDetails,
};

/// Errors specific to redeeming a loyalty product.
#[derive(Debug, Error)]
pub enum RedeemError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("loyalty product is not available")]
    ProductUnavailable,

    #[error("loyalty product is out of stock")]
    OutOfStock,

    #[error("not enough loyalty points")]
    InsufficientPoints,

    #[error("quantity must be positive")]
    InvalidQuantity,
}

impl From<sqlx::Error> for RedeemError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

const REDEMPTION_DETAIL_COLUMNS: &str = r"
    r.id, r.user_id, r.loyalty_product_id, r.points_spent, r.quantity, r.status,
    r.country, r.state, r.address, r.created_at,
    p.name_en AS product_name_en, p.name_ar AS product_name_ar,
    p.image AS product_image,
    u.name AS customer_name, u.phone AS customer_phone
";

/// Repository for loyalty shop database operations.
pub struct LoyaltyRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LoyaltyRepository<'a> {
    /// Create a new loyalty repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the loyalty settings, creating the default row on first read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn settings(&self) -> Result<LoyaltySettings, RepositoryError> {
        let existing = sqlx::query_as::<_, LoyaltySettings>(
            "SELECT id, min_points_to_unlock, points_per_currency FROM loyalty_settings LIMIT 1",
        )
        .fetch_optional(self.pool)
        .await?;

        if let Some(settings) = existing {
            return Ok(settings);
        }

        let settings = sqlx::query_as::<_, LoyaltySettings>(
            r"
            INSERT INTO loyalty_settings DEFAULT VALUES
            RETURNING id, min_points_to_unlock, points_per_currency
            ",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(settings)
    }

    /// Update the loyalty settings. Absent fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn update_settings(
        &self,
        min_points_to_unlock: Option<i32>,
        points_per_currency: Option<i32>,
    ) -> Result<LoyaltySettings, RepositoryError> {
        // Ensure the singleton row exists before updating it.
        let current = self.settings().await?;

        let settings = sqlx::query_as::<_, LoyaltySettings>(
            r"
            UPDATE loyalty_settings
            SET min_points_to_unlock = COALESCE($2, min_points_to_unlock),
                points_per_currency = COALESCE($3, points_per_currency)
            WHERE id = $1
            RETURNING id, min_points_to_unlock, points_per_currency
            ",
        )
        .bind(current.id)
        .bind(min_points_to_unlock)
        .bind(points_per_currency)
        .fetch_one(self.pool)
        .await?;

        Ok(settings)
    }

    /// List active loyalty products with their product details.
    ///
    /// With `include_exhausted = false` (the customer view), products whose
    /// redeemable stock has run out are hidden.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_products(
        &self,
        include_exhausted: bool,
    ) -> Result<Vec<LoyaltyProductWithProduct>, RepositoryError> {
        let products = sqlx::query_as::<_, LoyaltyProductWithProduct>(
            r"
            SELECT lp.id, lp.product_id, lp.points_required, lp.stock_limit, lp.stock_used,
                   lp.is_active, lp.created_at,
                   p.name_en AS product_name_en, p.name_ar AS product_name_ar,
                   p.image AS product_image, p.price AS product_price
            FROM loyalty_products lp
            JOIN products p ON p.id = lp.product_id
            WHERE lp.is_active
              AND ($1 OR lp.stock_limit IS NULL OR lp.stock_used < lp.stock_limit)
            ORDER BY lp.points_required ASC
            ",
        )
        .bind(include_exhausted)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// List products not yet offered in the loyalty shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn available_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name_en, name_ar, description_en, description_ar, price, cost_price,
                   stock, image, is_new, is_sale, discount, loyalty_points_enabled,
                   loyalty_points_value, category_id, created_at, updated_at
            FROM products
            WHERE id NOT IN (SELECT product_id FROM loyalty_products)
            ORDER BY name_en ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Offer a product in the loyalty shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the product is already offered.
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn add_product(
        &self,
        product_id: ProductId,
        points_required: i32,
        stock_limit: Option<i32>,
    ) -> Result<LoyaltyProduct, RepositoryError> {
        sqlx::query_as::<_, LoyaltyProduct>(
            r"
            INSERT INTO loyalty_products (product_id, points_required, stock_limit)
            VALUES ($1, $2, $3)
            RETURNING id, product_id, points_required, stock_limit, stock_used,
                      is_active, created_at
            ",
        )
        .bind(product_id)
        .bind(points_required)
        .bind(stock_limit)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return RepositoryError::Conflict(
                        "product is already in the loyalty shop".to_owned(),
                    );
                }
                if db_err.is_foreign_key_violation() {
                    return RepositoryError::NotFound;
                }
            }
            RepositoryError::Database(e)
        })
    }

    /// Update a loyalty product. Absent fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the entry doesn't exist.
    pub async fn update_product(
        &self,
        id: LoyaltyProductId,
        points_required: Option<i32>,
        stock_limit: Option<i32>,
        is_active: Option<bool>,
    ) -> Result<LoyaltyProduct, RepositoryError> {
        sqlx::query_as::<_, LoyaltyProduct>(
            r"
            UPDATE loyalty_products
            SET points_required = COALESCE($2, points_required),
                stock_limit = COALESCE($3, stock_limit),
                is_active = COALESCE($4, is_active)
            WHERE id = $1
            RETURNING id, product_id, points_required, stock_limit, stock_used,
                      is_active, created_at
            ",
        )
        .bind(id)
        .bind(points_required)
        .bind(stock_limit)
        .bind(is_active)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Remove a product from the loyalty shop.
    ///
    /// # Returns
    ///
    /// Returns `true` if the entry was removed, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_product(&self, id: LoyaltyProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM loyalty_products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Redeem a loyalty product. Runs as one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RedeemError::ProductUnavailable` if the entry is missing or
    /// inactive, `RedeemError::OutOfStock` if the redeemable stock is
    /// exhausted, and `RedeemError::InsufficientPoints` if the user cannot
    /// cover the cost.
    pub async fn redeem(
        &self,
        user_id: UserId,
        loyalty_product_id: LoyaltyProductId,
        quantity: i32,
        country: Option<&str>,
        state: Option<&str>,
        address: Option<&str>,
    ) -> Result<LoyaltyRedemption, RedeemError> {
        if quantity <= 0 {
            return Err(RedeemError::InvalidQuantity);
        }

        let mut tx = self.pool.begin().await?;

        let product = sqlx::query_as::<_, LoyaltyProduct>(
            r"
            SELECT id, product_id, points_required, stock_limit, stock_used,
                   is_active, created_at
            FROM loyalty_products
            WHERE id = $1
            FOR UPDATE
            ",
        )
        .bind(loyalty_product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RedeemError::ProductUnavailable)?;

        if !product.is_active {
            return Err(RedeemError::ProductUnavailable);
        }

        if let Some(limit) = product.stock_limit {
            if product.stock_used + quantity > limit {
                return Err(RedeemError::OutOfStock);
            }
        }

        let points_needed = product.points_required * quantity;

        let available: i32 =
            sqlx::query_scalar("SELECT loyalty_points FROM users WHERE id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(RepositoryError::NotFound)?;

        if available < points_needed {
            return Err(RedeemError::InsufficientPoints);
        }

        sqlx::query("UPDATE users SET loyalty_points = loyalty_points - $2 WHERE id = $1")
            .bind(user_id)
            .bind(points_needed)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::on_check(e, "loyalty points cannot go negative"))?;

        sqlx::query("UPDATE loyalty_products SET stock_used = stock_used + $2 WHERE id = $1")
            .bind(loyalty_product_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;

        let redemption = sqlx::query_as::<_, LoyaltyRedemption>(
            r"
            INSERT INTO loyalty_redemptions (user_id, loyalty_product_id, points_spent,
                                             quantity, country, state, address)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, loyalty_product_id, points_spent, quantity, status,
                      country, state, address, created_at
            ",
        )
        .bind(user_id)
        .bind(loyalty_product_id)
        .bind(points_needed)
        .bind(quantity)
        .bind(country)
        .bind(state)
        .bind(address)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(redemption)
    }

    /// A user's own redemptions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn redemptions_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<RedemptionWithDetails>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {REDEMPTION_DETAIL_COLUMNS}
            FROM loyalty_redemptions r
            JOIN loyalty_products lp ON lp.id = r.loyalty_product_id
            JOIN products p ON p.id = lp.product_id
            JOIN users u ON u.id = r.user_id
            WHERE r.user_id = $1
            ORDER BY r.created_at DESC
            "
        );

        let redemptions = sqlx::query_as::<_, RedemptionWithDetails>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;

        Ok(redemptions)
    }

    /// All redemptions, optionally filtered by status, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_redemptions(
        &self,
        status: Option<RedemptionStatus>,
    ) -> Result<Vec<RedemptionWithDetails>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {REDEMPTION_DETAIL_COLUMNS}
            FROM loyalty_redemptions r
            JOIN loyalty_products lp ON lp.id = r.loyalty_product_id
            JOIN products p ON p.id = lp.product_id
            JOIN users u ON u.id = r.user_id
            WHERE ($1::redemption_status IS NULL OR r.status = $1)
            ORDER BY r.created_at DESC
            "
        );

        let redemptions = sqlx::query_as::<_, RedemptionWithDetails>(&sql)
            .bind(status)
            .fetch_all(self.pool)
            .await?;

        Ok(redemptions)
    }

    /// Set a redemption's status.
    ///
    /// The first transition to `cancelled` refunds the points and restores
    /// the redeemable stock, in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the redemption doesn't exist.
    pub async fn set_redemption_status(
        &self,
        id: RedemptionId,
        status: RedemptionStatus,
    ) -> Result<LoyaltyRedemption, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, LoyaltyRedemption>(
            r"
            SELECT id, user_id, loyalty_product_id, points_spent, quantity, status,
                   country, state, address, created_at
            FROM loyalty_redemptions
            WHERE id = $1
            FOR UPDATE
            ",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if status == RedemptionStatus::Cancelled && current.status != RedemptionStatus::Cancelled {
            sqlx::query("UPDATE users SET loyalty_points = loyalty_points + $2 WHERE id = $1")
                .bind(current.user_id)
                .bind(current.points_spent)
                .execute(&mut *tx)
                .await?;

            sqlx::query(
                r"
                UPDATE loyalty_products
                SET stock_used = GREATEST(stock_used - $2, 0)
                WHERE id = $1
                ",
            )
            .bind(current.loyalty_product_id)
            .bind(current.quantity)
            .execute(&mut *tx)
            .await?;
        }

        let redemption = sqlx::query_as::<_, LoyaltyRedemption>(
            r"
            UPDATE loyalty_redemptions
            SET status = $2
            WHERE id = $1
            RETURNING id, user_id, loyalty_product_id, points_spent, quantity, status,
                      country, state, address, created_at
            ",
        )
        .bind(id)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(redemption)
    }
}
