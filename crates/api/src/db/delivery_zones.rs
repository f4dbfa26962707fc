//! Delivery zone repository.

use rust_decimal::Decimal;
use sqlx::PgPool;

use nabta_core::DeliveryZoneId;

use super::RepositoryError;
use crate::models::DeliveryZone;

/// Repository for delivery zone database operations.
pub struct DeliveryZoneRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DeliveryZoneRepository<'a> {
    /// Create a new delivery zone repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List zones, sorted by country then state. Pass `false` to restrict
    /// to active zones (the public listing).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<DeliveryZone>, RepositoryError> {
        let zones = sqlx::query_as::<_, DeliveryZone>(
            r"
            SELECT id, country, state, price, is_active, created_at
            FROM delivery_zones
            WHERE $1 OR is_active
            ORDER BY country ASC, state ASC
            ",
        )
        .bind(include_inactive)
        .fetch_all(self.pool)
        .await?;

        Ok(zones)
    }

    /// Price for an address, if an active zone matches (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn price_for(
        &self,
        country: &str,
        state: &str,
    ) -> Result<Option<Decimal>, RepositoryError> {
        let price = sqlx::query_scalar(
            r"
            SELECT price FROM delivery_zones
            WHERE LOWER(country) = LOWER($1) AND LOWER(state) = LOWER($2) AND is_active
            ",
        )
        .bind(country)
        .bind(state)
        .fetch_optional(self.pool)
        .await?;

        Ok(price)
    }

    /// Create a zone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the country/state pair exists.
    pub async fn create(
        &self,
        country: &str,
        state: &str,
        price: Decimal,
    ) -> Result<DeliveryZone, RepositoryError> {
        sqlx::query_as::<_, DeliveryZone>(
            r"
            INSERT INTO delivery_zones (country, state, price)
            VALUES ($1, $2, $3)
            RETURNING id, country, state, price, is_active, created_at
            ",
        )
        .bind(country)
        .bind(state)
        .bind(price)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::on_unique(e, "delivery zone already exists"))
    }

    /// Update a zone. Absent fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the zone doesn't exist.
    pub async fn update(
        &self,
        id: DeliveryZoneId,
        price: Option<Decimal>,
        is_active: Option<bool>,
    ) -> Result<DeliveryZone, RepositoryError> {
        sqlx::query_as::<_, DeliveryZone>(
            r"
            UPDATE delivery_zones
            SET price = COALESCE($2, price),
                is_active = COALESCE($3, is_active)
            WHERE id = $1
            RETURNING id, country, state, price, is_active, created_at
            ",
        )
        .bind(id)
        .bind(price)
        .bind(is_active)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }
}
