//! Support info repository.

use sqlx::PgPool;

use nabta_core::SupportInfoId;

use super::RepositoryError;
use crate::models::SupportInfo;

/// Repository for support entry database operations.
pub struct SupportRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SupportRepository<'a> {
    /// Create a new support repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all support entries, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<SupportInfo>, RepositoryError> {
        let entries = sqlx::query_as::<_, SupportInfo>(
            r"
            SELECT id, title_en, title_ar, content_en, content_ar, phone, email, created_at
            FROM support_info
            ORDER BY created_at ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    /// Create a support entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        title_en: &str,
        title_ar: &str,
        content_en: &str,
        content_ar: &str,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<SupportInfo, RepositoryError> {
        let entry = sqlx::query_as::<_, SupportInfo>(
            r"
            INSERT INTO support_info (title_en, title_ar, content_en, content_ar, phone, email)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title_en, title_ar, content_en, content_ar, phone, email, created_at
            ",
        )
        .bind(title_en)
        .bind(title_ar)
        .bind(content_en)
        .bind(content_ar)
        .bind(phone)
        .bind(email)
        .fetch_one(self.pool)
        .await?;

        Ok(entry)
    }

    /// Update a support entry. Absent fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the entry doesn't exist.
    pub async fn update(
        &self,
        id: SupportInfoId,
        title_en: Option<&str>,
        title_ar: Option<&str>,
        content_en: Option<&str>,
        content_ar: Option<&str>,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<SupportInfo, RepositoryError> {
        sqlx::query_as::<_, SupportInfo>(
            r"
            UPDATE support_info
            SET title_en = COALESCE($2, title_en),
                title_ar = COALESCE($3, title_ar),
                content_en = COALESCE($4, content_en),
                content_ar = COALESCE($5, content_ar),
                phone = COALESCE($6, phone),
                email = COALESCE($7, email)
            WHERE id = $1
            RETURNING id, title_en, title_ar, content_en, content_ar, phone, email, created_at
            ",
        )
        .bind(id)
        .bind(title_en)
        .bind(title_ar)
        .bind(content_en)
        .bind(content_ar)
        .bind(phone)
        .bind(email)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a support entry.
    ///
    /// # Returns
    ///
    /// Returns `true` if the entry was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: SupportInfoId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM support_info WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
