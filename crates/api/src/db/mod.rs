//! Database operations for the Nabta `PostgreSQL` database.
//!
//! One repository per aggregate, each a thin borrow of the shared pool.
//! Multi-step writes (order creation, procurement stock changes, loyalty
//! redemptions) run inside a single transaction.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p nabta-cli -- migrate
//! ```

pub mod bank_accounts;
pub mod categories;
pub mod coupons;
pub mod delivery_zones;
pub mod loyalty;
pub mod messages;
pub mod orders;
pub mod procurements;
pub mod products;
pub mod recipes;
pub mod reports;
pub mod settings;
pub mod support;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use bank_accounts::BankAccountRepository;
pub use categories::CategoryRepository;
pub use coupons::CouponRepository;
pub use delivery_zones::DeliveryZoneRepository;
pub use loyalty::LoyaltyRepository;
pub use messages::MessageRepository;
pub use orders::OrderRepository;
pub use procurements::ProcurementRepository;
pub use products::ProductRepository;
pub use recipes::RecipeRepository;
pub use reports::ReportRepository;
pub use settings::SettingsRepository;
pub use support::SupportRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique phone, negative stock).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a sqlx error to `Conflict` when it is a unique violation,
    /// preserving everything else as `Database`.
    pub(crate) fn on_unique(e: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(message.to_owned());
        }
        Self::Database(e)
    }

    /// Map a sqlx error to `Conflict` when it is a check violation
    /// (negative stock, negative points), preserving everything else.
    pub(crate) fn on_check(e: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_check_violation()
        {
            return Self::Conflict(message.to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
