//! Category repository.

use sqlx::PgPool;

use nabta_core::CategoryId;

use super::RepositoryError;
use crate::models::{Category, CategoryWithCount, Product};

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories with how many products each holds.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepositoryError> {
        let categories = sqlx::query_as::<_, CategoryWithCount>(
            r"
            SELECT c.id, c.name_en, c.name_ar, c.description, c.parent_id,
                   c.created_at, c.updated_at,
                   COUNT(p.id) AS product_count
            FROM categories c
            LEFT JOIN products p ON p.category_id = c.id
            GROUP BY c.id
            ORDER BY c.name_en ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Get a single category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name_en, name_ar, description, parent_id, created_at, updated_at
            FROM categories
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// List the products assigned to a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products(&self, id: CategoryId) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name_en, name_ar, description_en, description_ar, price, cost_price,
                   stock, image, is_new, is_sale, discount, loyalty_points_enabled,
                   loyalty_points_value, category_id, created_at, updated_at
            FROM products
            WHERE category_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        name_en: &str,
        name_ar: &str,
        description: Option<&str>,
        parent_id: Option<CategoryId>,
    ) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            INSERT INTO categories (name_en, name_ar, description, parent_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name_en, name_ar, description, parent_id, created_at, updated_at
            ",
        )
        .bind(name_en)
        .bind(name_ar)
        .bind(description)
        .bind(parent_id)
        .fetch_one(self.pool)
        .await?;

        Ok(category)
    }

    /// Update a category. Absent fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    pub async fn update(
        &self,
        id: CategoryId,
        name_en: Option<&str>,
        name_ar: Option<&str>,
        description: Option<&str>,
        parent_id: Option<CategoryId>,
    ) -> Result<Category, RepositoryError> {
        sqlx::query_as::<_, Category>(
            r"
            UPDATE categories
            SET name_en = COALESCE($2, name_en),
                name_ar = COALESCE($3, name_ar),
                description = COALESCE($4, description),
                parent_id = COALESCE($5, parent_id),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name_en, name_ar, description, parent_id, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(name_en)
        .bind(name_ar)
        .bind(description)
        .bind(parent_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a category. Products keep existing with a NULL category.
    ///
    /// # Returns
    ///
    /// Returns `true` if the category was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: CategoryId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
