//! Product repository.
//!
//! Stock is deliberately absent from the insert/update surface here: it is
//! only ever changed by the procurement repository.

use rust_decimal::Decimal;
use sqlx::PgPool;

use nabta_core::{CategoryId, ProductId};

use super::RepositoryError;
use crate::models::Product;

/// Fields for a new product.
#[derive(Debug)]
pub struct NewProduct {
    pub name_en: String,
    pub name_ar: String,
    pub description_en: Option<String>,
    pub description_ar: Option<String>,
    pub price: Decimal,
    pub cost_price: Option<Decimal>,
    pub image: Option<String>,
    pub is_new: bool,
    pub is_sale: bool,
    pub discount: Option<Decimal>,
    pub loyalty_points_enabled: bool,
    pub loyalty_points_value: i32,
    pub category_id: Option<CategoryId>,
}

/// Optional fields for a product update. `None` leaves a column as-is.
#[derive(Debug, Default)]
pub struct ProductUpdate {
    pub name_en: Option<String>,
    pub name_ar: Option<String>,
    pub description_en: Option<String>,
    pub description_ar: Option<String>,
    pub price: Option<Decimal>,
    pub cost_price: Option<Decimal>,
    pub image: Option<String>,
    pub is_new: Option<bool>,
    pub is_sale: Option<bool>,
    pub discount: Option<Decimal>,
    pub loyalty_points_enabled: Option<bool>,
    pub loyalty_points_value: Option<i32>,
    pub category_id: Option<CategoryId>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, optionally filtered by category and a case-insensitive
    /// search over both names.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        category_id: Option<CategoryId>,
        search: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name_en, name_ar, description_en, description_ar, price, cost_price,
                   stock, image, is_new, is_sale, discount, loyalty_points_enabled,
                   loyalty_points_value, category_id, created_at, updated_at
            FROM products
            WHERE ($1::bigint IS NULL OR category_id = $1)
              AND ($2::text IS NULL
                   OR name_en ILIKE '%' || $2 || '%'
                   OR name_ar ILIKE '%' || $2 || '%')
            ORDER BY created_at DESC
            ",
        )
        .bind(category_id)
        .bind(search)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name_en, name_ar, description_en, description_ar, price, cost_price,
                   stock, image, is_new, is_sale, discount, loyalty_points_enabled,
                   loyalty_points_value, category_id, created_at, updated_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Create a product. Stock always starts at zero.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, new: NewProduct) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            INSERT INTO products (name_en, name_ar, description_en, description_ar,
                                  price, cost_price, image, is_new, is_sale, discount,
                                  loyalty_points_enabled, loyalty_points_value, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, name_en, name_ar, description_en, description_ar, price, cost_price,
                      stock, image, is_new, is_sale, discount, loyalty_points_enabled,
                      loyalty_points_value, category_id, created_at, updated_at
            ",
        )
        .bind(new.name_en)
        .bind(new.name_ar)
        .bind(new.description_en)
        .bind(new.description_ar)
        .bind(new.price)
        .bind(new.cost_price)
        .bind(new.image)
        .bind(new.is_new)
        .bind(new.is_sale)
        .bind(new.discount)
        .bind(new.loyalty_points_enabled)
        .bind(new.loyalty_points_value)
        .bind(new.category_id)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Update a product. Absent fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn update(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(
            r"
            UPDATE products
            SET name_en = COALESCE($2, name_en),
                name_ar = COALESCE($3, name_ar),
                description_en = COALESCE($4, description_en),
                description_ar = COALESCE($5, description_ar),
                price = COALESCE($6, price),
                cost_price = COALESCE($7, cost_price),
                image = COALESCE($8, image),
                is_new = COALESCE($9, is_new),
                is_sale = COALESCE($10, is_sale),
                discount = COALESCE($11, discount),
                loyalty_points_enabled = COALESCE($12, loyalty_points_enabled),
                loyalty_points_value = COALESCE($13, loyalty_points_value),
                category_id = COALESCE($14, category_id),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name_en, name_ar, description_en, description_ar, price, cost_price,
                      stock, image, is_new, is_sale, discount, loyalty_points_enabled,
                      loyalty_points_value, category_id, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(update.name_en)
        .bind(update.name_ar)
        .bind(update.description_en)
        .bind(update.description_ar)
        .bind(update.price)
        .bind(update.cost_price)
        .bind(update.image)
        .bind(update.is_new)
        .bind(update.is_sale)
        .bind(update.discount)
        .bind(update.loyalty_points_enabled)
        .bind(update.loyalty_points_value)
        .bind(update.category_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the product is referenced by
    /// order or procurement lines.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::Conflict(
                        "product is referenced by existing orders".to_owned(),
                    );
                }
                RepositoryError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
