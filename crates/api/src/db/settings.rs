//! Site settings repository (singleton row).

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::SiteSettings;

/// Optional fields for a settings update. `None` leaves a column as-is.
#[derive(Debug, Default)]
pub struct SettingsUpdate {
    pub support_phone: Option<String>,
    pub support_email: Option<String>,
    pub support_whatsapp: Option<String>,
    pub support_address_en: Option<String>,
    pub support_address_ar: Option<String>,
    pub working_hours_en: Option<String>,
    pub working_hours_ar: Option<String>,
}

/// Repository for site settings database operations.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

const SETTINGS_COLUMNS: &str = r"
    id, support_phone, support_email, support_whatsapp, support_address_en,
    support_address_ar, working_hours_en, working_hours_ar, banner_image,
    created_at, updated_at
";

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the site settings, creating the default row on first read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_create(&self) -> Result<SiteSettings, RepositoryError> {
        let sql = format!("SELECT {SETTINGS_COLUMNS} FROM site_settings LIMIT 1");
        let existing = sqlx::query_as::<_, SiteSettings>(&sql)
            .fetch_optional(self.pool)
            .await?;

        if let Some(settings) = existing {
            return Ok(settings);
        }

        let sql = format!("INSERT INTO site_settings DEFAULT VALUES RETURNING {SETTINGS_COLUMNS}");
        let settings = sqlx::query_as::<_, SiteSettings>(&sql)
            .fetch_one(self.pool)
            .await?;

        Ok(settings)
    }

    /// Update the site settings. Absent fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn update(&self, update: SettingsUpdate) -> Result<SiteSettings, RepositoryError> {
        let current = self.get_or_create().await?;

        let sql = format!(
            r"
            UPDATE site_settings
            SET support_phone = COALESCE($2, support_phone),
                support_email = COALESCE($3, support_email),
                support_whatsapp = COALESCE($4, support_whatsapp),
                support_address_en = COALESCE($5, support_address_en),
                support_address_ar = COALESCE($6, support_address_ar),
                working_hours_en = COALESCE($7, working_hours_en),
                working_hours_ar = COALESCE($8, working_hours_ar),
                updated_at = now()
            WHERE id = $1
            RETURNING {SETTINGS_COLUMNS}
            "
        );

        let settings = sqlx::query_as::<_, SiteSettings>(&sql)
            .bind(current.id)
            .bind(update.support_phone)
            .bind(update.support_email)
            .bind(update.support_whatsapp)
            .bind(update.support_address_en)
            .bind(update.support_address_ar)
            .bind(update.working_hours_en)
            .bind(update.working_hours_ar)
            .fetch_one(self.pool)
            .await?;

        Ok(settings)
    }

    /// Replace the banner image URL.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn set_banner(&self, banner_url: &str) -> Result<SiteSettings, RepositoryError> {
        let current = self.get_or_create().await?;

        let sql = format!(
            r"
            UPDATE site_settings
            SET banner_image = $2, updated_at = now()
            WHERE id = $1
            RETURNING {SETTINGS_COLUMNS}
            "
        );

        let settings = sqlx::query_as::<_, SiteSettings>(&sql)
            .bind(current.id)
            .bind(banner_url)
            .fetch_one(self.pool)
            .await?;

        Ok(settings)
    }
}
