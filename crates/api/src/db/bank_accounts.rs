//! Bank account repository. Deletion is soft: accounts are deactivated so
//! old orders keep a valid payment reference.

use sqlx::PgPool;

use nabta_core::BankAccountId;

use super::RepositoryError;
use crate::models::BankAccount;

/// Optional fields for a bank account update. `None` leaves a column as-is.
#[derive(Debug, Default)]
pub struct BankAccountUpdate {
    pub bank_name_en: Option<String>,
    pub bank_name_ar: Option<String>,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub branch_en: Option<String>,
    pub branch_ar: Option<String>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
}

/// Repository for bank account database operations.
pub struct BankAccountRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BankAccountRepository<'a> {
    /// Create a new bank account repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List accounts. Pass `false` to restrict to active accounts (the
    /// public listing).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<BankAccount>, RepositoryError> {
        let accounts = sqlx::query_as::<_, BankAccount>(
            r"
            SELECT id, bank_name_en, bank_name_ar, account_name, account_number,
                   branch_en, branch_ar, image, is_active, created_at
            FROM bank_accounts
            WHERE $1 OR is_active
            ORDER BY created_at DESC
            ",
        )
        .bind(include_inactive)
        .fetch_all(self.pool)
        .await?;

        Ok(accounts)
    }

    /// Create a bank account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        bank_name_en: &str,
        bank_name_ar: &str,
        account_name: &str,
        account_number: &str,
        branch_en: Option<&str>,
        branch_ar: Option<&str>,
        image: Option<&str>,
    ) -> Result<BankAccount, RepositoryError> {
        let account = sqlx::query_as::<_, BankAccount>(
            r"
            INSERT INTO bank_accounts (bank_name_en, bank_name_ar, account_name,
                                       account_number, branch_en, branch_ar, image)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, bank_name_en, bank_name_ar, account_name, account_number,
                      branch_en, branch_ar, image, is_active, created_at
            ",
        )
        .bind(bank_name_en)
        .bind(bank_name_ar)
        .bind(account_name)
        .bind(account_number)
        .bind(branch_en)
        .bind(branch_ar)
        .bind(image)
        .fetch_one(self.pool)
        .await?;

        Ok(account)
    }

    /// Update a bank account. Absent fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    pub async fn update(
        &self,
        id: BankAccountId,
        update: BankAccountUpdate,
    ) -> Result<BankAccount, RepositoryError> {
        sqlx::query_as::<_, BankAccount>(
            r"
            UPDATE bank_accounts
            SET bank_name_en = COALESCE($2, bank_name_en),
                bank_name_ar = COALESCE($3, bank_name_ar),
                account_name = COALESCE($4, account_name),
                account_number = COALESCE($5, account_number),
                branch_en = COALESCE($6, branch_en),
                branch_ar = COALESCE($7, branch_ar),
                image = COALESCE($8, image),
                is_active = COALESCE($9, is_active)
            WHERE id = $1
            RETURNING id, bank_name_en, bank_name_ar, account_name, account_number,
                      branch_en, branch_ar, image, is_active, created_at
            ",
        )
        .bind(id)
        .bind(update.bank_name_en)
        .bind(update.bank_name_ar)
        .bind(update.account_name)
        .bind(update.account_number)
        .bind(update.branch_en)
        .bind(update.branch_ar)
        .bind(update.image)
        .bind(update.is_active)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Deactivate a bank account (soft delete).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    pub async fn deactivate(&self, id: BankAccountId) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE bank_accounts SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
