//! Coupon repository. Codes are stored uppercase.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use nabta_core::{CouponId, DiscountType};

use super::RepositoryError;
use crate::models::Coupon;

/// Optional fields for a coupon update. `None` leaves a column as-is.
#[derive(Debug, Default)]
pub struct CouponUpdate {
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<Decimal>,
    pub min_purchase: Option<Decimal>,
    pub max_uses: Option<i32>,
    pub is_active: Option<bool>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Repository for coupon database operations.
pub struct CouponRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CouponRepository<'a> {
    /// Create a new coupon repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all coupons, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Coupon>, RepositoryError> {
        let coupons = sqlx::query_as::<_, Coupon>(
            r"
            SELECT id, code, discount_type, discount_value, min_purchase, max_uses,
                   used_count, is_active, expires_at, created_at
            FROM coupons
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(coupons)
    }

    /// Look a coupon up by code (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_code(&self, code: &str) -> Result<Option<Coupon>, RepositoryError> {
        let coupon = sqlx::query_as::<_, Coupon>(
            r"
            SELECT id, code, discount_type, discount_value, min_purchase, max_uses,
                   used_count, is_active, expires_at, created_at
            FROM coupons
            WHERE code = UPPER($1)
            ",
        )
        .bind(code.trim())
        .fetch_optional(self.pool)
        .await?;

        Ok(coupon)
    }

    /// Create a coupon.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the code already exists.
    pub async fn create(
        &self,
        code: &str,
        discount_type: DiscountType,
        discount_value: Decimal,
        min_purchase: Option<Decimal>,
        max_uses: Option<i32>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Coupon, RepositoryError> {
        sqlx::query_as::<_, Coupon>(
            r"
            INSERT INTO coupons (code, discount_type, discount_value, min_purchase,
                                 max_uses, expires_at)
            VALUES (UPPER($1), $2, $3, $4, $5, $6)
            RETURNING id, code, discount_type, discount_value, min_purchase, max_uses,
                      used_count, is_active, expires_at, created_at
            ",
        )
        .bind(code.trim())
        .bind(discount_type)
        .bind(discount_value)
        .bind(min_purchase)
        .bind(max_uses)
        .bind(expires_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::on_unique(e, "coupon code already exists"))
    }

    /// Update a coupon. Absent fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the coupon doesn't exist.
    pub async fn update(
        &self,
        id: CouponId,
        update: CouponUpdate,
    ) -> Result<Coupon, RepositoryError> {
        sqlx::query_as::<_, Coupon>(
            r"
            UPDATE coupons
            SET discount_type = COALESCE($2, discount_type),
                discount_value = COALESCE($3, discount_value),
                min_purchase = COALESCE($4, min_purchase),
                max_uses = COALESCE($5, max_uses),
                is_active = COALESCE($6, is_active),
                expires_at = COALESCE($7, expires_at)
            WHERE id = $1
            RETURNING id, code, discount_type, discount_value, min_purchase, max_uses,
                      used_count, is_active, expires_at, created_at
            ",
        )
        .bind(id)
        .bind(update.discount_type)
        .bind(update.discount_value)
        .bind(update.min_purchase)
        .bind(update.max_uses)
        .bind(update.is_active)
        .bind(update.expires_at)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a coupon.
    ///
    /// # Returns
    ///
    /// Returns `true` if the coupon was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: CouponId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM coupons WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
