//! Procurement repository.
//!
//! Procurement is the only writer of product stock. Creation increments
//! stock per line; editing reverses the old lines before applying the new
//! ones, all in one transaction so a failure leaves stock untouched.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use nabta_core::{ProcurementId, ProcurementStatus, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Procurement, ProcurementItemWithProduct, ProcurementWithItems};
use crate::services::reference;

/// A line in a procurement request.
#[derive(Debug, Clone)]
pub struct NewProcurementItem {
    pub product_id: ProductId,
    pub quantity: i32,
    pub cost_price: Decimal,
}

/// Everything needed to record a procurement.
#[derive(Debug)]
pub struct NewProcurement {
    pub supplier: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<NewProcurementItem>,
    pub created_by: Option<UserId>,
}

/// Repository for procurement database operations.
pub struct ProcurementRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProcurementRepository<'a> {
    /// Create a new procurement repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all procurements with their lines, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self) -> Result<Vec<ProcurementWithItems>, RepositoryError> {
        let procurements = sqlx::query_as::<_, Procurement>(
            r"
            SELECT id, order_number, supplier, notes, total_cost, status, created_by,
                   created_at, updated_at
            FROM procurements
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let ids: Vec<i64> = procurements.iter().map(|p| i64::from(p.id)).collect();
        let mut items_by_procurement = self.items_for(&ids).await?;

        Ok(procurements
            .into_iter()
            .map(|p| ProcurementWithItems {
                items: items_by_procurement.remove(&p.id).unwrap_or_default(),
                procurement: p,
            })
            .collect())
    }

    /// Get a single procurement with its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(
        &self,
        id: ProcurementId,
    ) -> Result<Option<ProcurementWithItems>, RepositoryError> {
        let procurement = sqlx::query_as::<_, Procurement>(
            r"
            SELECT id, order_number, supplier, notes, total_cost, status, created_by,
                   created_at, updated_at
            FROM procurements
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(procurement) = procurement else {
            return Ok(None);
        };

        let mut items_by_procurement = self.items_for(&[i64::from(id)]).await?;

        Ok(Some(ProcurementWithItems {
            items: items_by_procurement.remove(&procurement.id).unwrap_or_default(),
            procurement,
        }))
    }

    /// Record a procurement and apply its quantities to product stock.
    /// Runs as one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if a line names a missing product.
    pub async fn create(
        &self,
        new: NewProcurement,
    ) -> Result<ProcurementWithItems, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let total_cost: Decimal = new
            .items
            .iter()
            .map(|i| i.cost_price * Decimal::from(i.quantity))
            .sum();

        let procurement = sqlx::query_as::<_, Procurement>(
            r"
            INSERT INTO procurements (order_number, supplier, notes, total_cost, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, order_number, supplier, notes, total_cost, status, created_by,
                      created_at, updated_at
            ",
        )
        .bind(reference::purchase_order_number())
        .bind(&new.supplier)
        .bind(&new.notes)
        .bind(total_cost)
        .bind(new.created_by)
        .fetch_one(&mut *tx)
        .await?;

        insert_items(&mut tx, procurement.id, &new.items).await?;
        apply_stock(&mut tx, &new.items, 1).await?;

        tx.commit().await?;

        let mut items_by_procurement = self.items_for(&[i64::from(procurement.id)]).await?;
        Ok(ProcurementWithItems {
            items: items_by_procurement.remove(&procurement.id).unwrap_or_default(),
            procurement,
        })
    }

    /// Replace a procurement's lines and details.
    ///
    /// The old lines' quantities are subtracted from stock, then the new
    /// lines are inserted and applied, so stock always reflects exactly the
    /// stored lines. Runs as one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the procurement doesn't exist.
    /// Returns `RepositoryError::Conflict` if reversing the old lines would
    /// push a product's stock negative.
    pub async fn update(
        &self,
        id: ProcurementId,
        supplier: Option<String>,
        notes: Option<String>,
        items: Vec<NewProcurementItem>,
    ) -> Result<ProcurementWithItems, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let old_items = sqlx::query_as::<_, (i64, i32)>(
            r"
            SELECT product_id, quantity
            FROM procurement_items
            WHERE procurement_id = $1
            FOR UPDATE
            ",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        // Reverse the previously applied quantities.
        let reversal: Vec<NewProcurementItem> = old_items
            .into_iter()
            .map(|(product_id, quantity)| NewProcurementItem {
                product_id: ProductId::from(product_id),
                quantity,
                cost_price: Decimal::ZERO,
            })
            .collect();
        apply_stock(&mut tx, &reversal, -1).await?;

        sqlx::query("DELETE FROM procurement_items WHERE procurement_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let total_cost: Decimal = items
            .iter()
            .map(|i| i.cost_price * Decimal::from(i.quantity))
            .sum();

        let procurement = sqlx::query_as::<_, Procurement>(
            r"
            UPDATE procurements
            SET supplier = COALESCE($2, supplier),
                notes = COALESCE($3, notes),
                total_cost = $4,
                updated_at = now()
            WHERE id = $1
            RETURNING id, order_number, supplier, notes, total_cost, status, created_by,
                      created_at, updated_at
            ",
        )
        .bind(id)
        .bind(supplier)
        .bind(notes)
        .bind(total_cost)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        insert_items(&mut tx, id, &items).await?;
        apply_stock(&mut tx, &items, 1).await?;

        tx.commit().await?;

        let mut items_by_procurement = self.items_for(&[i64::from(id)]).await?;
        Ok(ProcurementWithItems {
            items: items_by_procurement.remove(&procurement.id).unwrap_or_default(),
            procurement,
        })
    }

    /// Set a procurement's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the procurement doesn't exist.
    pub async fn set_status(
        &self,
        id: ProcurementId,
        status: ProcurementStatus,
    ) -> Result<Procurement, RepositoryError> {
        sqlx::query_as::<_, Procurement>(
            r"
            UPDATE procurements
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, order_number, supplier, notes, total_cost, status, created_by,
                      created_at, updated_at
            ",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Fetch procurement lines (with product names) for a set of ids,
    /// grouped by procurement.
    async fn items_for(
        &self,
        ids: &[i64],
    ) -> Result<HashMap<ProcurementId, Vec<ProcurementItemWithProduct>>, RepositoryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let items = sqlx::query_as::<_, ProcurementItemWithProduct>(
            r"
            SELECT i.id, i.procurement_id, i.product_id, i.quantity, i.cost_price,
                   p.name_en AS product_name_en, p.name_ar AS product_name_ar
            FROM procurement_items i
            JOIN products p ON p.id = i.product_id
            WHERE i.procurement_id = ANY($1)
            ORDER BY i.id ASC
            ",
        )
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_procurement: HashMap<ProcurementId, Vec<ProcurementItemWithProduct>> =
            HashMap::new();
        for item in items {
            by_procurement
                .entry(item.procurement_id)
                .or_default()
                .push(item);
        }

        Ok(by_procurement)
    }
}

/// Insert procurement lines.
async fn insert_items(
    tx: &mut Transaction<'_, Postgres>,
    procurement_id: ProcurementId,
    items: &[NewProcurementItem],
) -> Result<(), RepositoryError> {
    for item in items {
        sqlx::query(
            r"
            INSERT INTO procurement_items (procurement_id, product_id, quantity, cost_price)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(procurement_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.cost_price)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;
    }
    Ok(())
}

/// Apply line quantities to product stock. `sign` is `1` to add the
/// quantities or `-1` to reverse them. Also records the latest cost price
/// when adding.
async fn apply_stock(
    tx: &mut Transaction<'_, Postgres>,
    items: &[NewProcurementItem],
    sign: i32,
) -> Result<(), RepositoryError> {
    for item in items {
        let result = if sign > 0 {
            sqlx::query(
                r"
                UPDATE products
                SET stock = stock + $2, cost_price = $3, updated_at = now()
                WHERE id = $1
                ",
            )
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.cost_price)
            .execute(&mut **tx)
            .await
        } else {
            sqlx::query(
                r"
                UPDATE products
                SET stock = stock - $2, updated_at = now()
                WHERE id = $1
                ",
            )
            .bind(item.product_id)
            .bind(item.quantity)
            .execute(&mut **tx)
            .await
        };

        let result =
            result.map_err(|e| RepositoryError::on_check(e, "stock cannot go negative"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
    }
    Ok(())
}
