//! Product recipe repository.

use sqlx::PgPool;

use nabta_core::{ProductId, RecipeId};

use super::RepositoryError;
use crate::models::{Product, ProductRecipe};

const RECIPE_COLUMNS: &str = r"
    id, product_id, recipe_name_en, recipe_name_ar, description_en, description_ar,
    image_url, is_active, created_at
";

/// Repository for product recipe database operations.
pub struct RecipeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RecipeRepository<'a> {
    /// Create a new recipe repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Products that have at least one active recipe.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products_with_recipes(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT DISTINCT p.id, p.name_en, p.name_ar, p.description_en, p.description_ar,
                   p.price, p.cost_price, p.stock, p.image, p.is_new, p.is_sale, p.discount,
                   p.loyalty_points_enabled, p.loyalty_points_value, p.category_id,
                   p.created_at, p.updated_at
            FROM products p
            JOIN product_recipes r ON r.product_id = p.id AND r.is_active
            ORDER BY p.name_en ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Active recipes for one product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductRecipe>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {RECIPE_COLUMNS}
            FROM product_recipes
            WHERE product_id = $1 AND is_active
            ORDER BY created_at ASC
            "
        );

        let recipes = sqlx::query_as::<_, ProductRecipe>(&sql)
            .bind(product_id)
            .fetch_all(self.pool)
            .await?;

        Ok(recipes)
    }

    /// Whether a product has any active recipes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn has_recipes(&self, product_id: ProductId) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM product_recipes WHERE product_id = $1 AND is_active)",
        )
        .bind(product_id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// All recipes, active or not (admin view).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<ProductRecipe>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {RECIPE_COLUMNS}
            FROM product_recipes
            ORDER BY created_at DESC
            "
        );

        let recipes = sqlx::query_as::<_, ProductRecipe>(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(recipes)
    }

    /// Create a recipe.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn create(
        &self,
        product_id: ProductId,
        recipe_name_en: &str,
        recipe_name_ar: &str,
        description_en: Option<&str>,
        description_ar: Option<&str>,
        image_url: Option<&str>,
    ) -> Result<ProductRecipe, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO product_recipes (product_id, recipe_name_en, recipe_name_ar,
                                         description_en, description_ar, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {RECIPE_COLUMNS}
            "
        );

        sqlx::query_as::<_, ProductRecipe>(&sql)
            .bind(product_id)
            .bind(recipe_name_en)
            .bind(recipe_name_ar)
            .bind(description_en)
            .bind(description_ar)
            .bind(image_url)
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::NotFound;
                }
                RepositoryError::Database(e)
            })
    }

    /// Update a recipe. Absent fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the recipe doesn't exist.
    pub async fn update(
        &self,
        id: RecipeId,
        recipe_name_en: Option<&str>,
        recipe_name_ar: Option<&str>,
        description_en: Option<&str>,
        description_ar: Option<&str>,
        image_url: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<ProductRecipe, RepositoryError> {
        let sql = format!(
            r"
            UPDATE product_recipes
            SET recipe_name_en = COALESCE($2, recipe_name_en),
                recipe_name_ar = COALESCE($3, recipe_name_ar),
                description_en = COALESCE($4, description_en),
                description_ar = COALESCE($5, description_ar),
                image_url = COALESCE($6, image_url),
                is_active = COALESCE($7, is_active)
            WHERE id = $1
            RETURNING {RECIPE_COLUMNS}
            "
        );

        sqlx::query_as::<_, ProductRecipe>(&sql)
            .bind(id)
            .bind(recipe_name_en)
            .bind(recipe_name_ar)
            .bind(description_en)
            .bind(description_ar)
            .bind(image_url)
            .bind(is_active)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a recipe.
    ///
    /// # Returns
    ///
    /// Returns `true` if the recipe was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: RecipeId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM product_recipes WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
