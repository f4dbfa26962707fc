//! User repository.

use sqlx::PgPool;

use nabta_core::{Phone, Role, UserId};

use super::RepositoryError;
use crate::models::{User, UserWithOrderCount};

/// Optional fields for an admin user update. `None` leaves a column as-is.
#[derive(Debug, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub loyalty_points: Option<i32>,
    pub is_active: Option<bool>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with the default `USER` role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the phone already exists.
    pub async fn create(
        &self,
        phone: &Phone,
        password_hash: &str,
        name: Option<&str>,
    ) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            r"
            INSERT INTO users (phone, password_hash, name)
            VALUES ($1, $2, $3)
            RETURNING id, phone, name, email, role, loyalty_points,
                      country, state, address, is_active, created_at, updated_at
            ",
        )
        .bind(phone.as_str())
        .bind(password_hash)
        .bind(name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::on_unique(e, "phone number already registered"))
    }

    /// Create a user with an explicit role (admin user management).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the phone already exists.
    pub async fn create_with_role(
        &self,
        phone: &Phone,
        password_hash: &str,
        name: Option<&str>,
        email: Option<&str>,
        role: Role,
    ) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            r"
            INSERT INTO users (phone, password_hash, name, email, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, phone, name, email, role, loyalty_points,
                      country, state, address, is_active, created_at, updated_at
            ",
        )
        .bind(phone.as_str())
        .bind(password_hash)
        .bind(name)
        .bind(email)
        .bind(role)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::on_unique(e, "phone number already registered"))
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT id, phone, name, email, role, loyalty_points,
                   country, state, address, is_active, created_at, updated_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user and their password hash by normalised phone number.
    ///
    /// Returns `None` if no such user exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_auth_by_phone(
        &self,
        phone: &Phone,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct AuthRow {
            #[sqlx(flatten)]
            user: User,
            password_hash: String,
        }

        let row = sqlx::query_as::<_, AuthRow>(
            r"
            SELECT id, phone, name, email, role, loyalty_points,
                   country, state, address, is_active, created_at, updated_at,
                   password_hash
            FROM users
            WHERE phone = $1
            ",
        )
        .bind(phone.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| (r.user, r.password_hash)))
    }

    /// List all users with the number of orders each has placed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_with_order_counts(&self) -> Result<Vec<UserWithOrderCount>, RepositoryError> {
        let users = sqlx::query_as::<_, UserWithOrderCount>(
            r"
            SELECT u.id, u.phone, u.name, u.email, u.role, u.loyalty_points,
                   u.country, u.state, u.address, u.is_active, u.created_at, u.updated_at,
                   COUNT(o.id) AS order_count
            FROM users u
            LEFT JOIN orders o ON o.user_id = u.id
            GROUP BY u.id
            ORDER BY u.created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Apply an admin update. Absent fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Conflict` if the points update would go negative.
    pub async fn update(&self, id: UserId, update: UserUpdate) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            r"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                role = COALESCE($5, role),
                loyalty_points = COALESCE($6, loyalty_points),
                is_active = COALESCE($7, is_active),
                country = COALESCE($8, country),
                state = COALESCE($9, state),
                address = COALESCE($10, address),
                updated_at = now()
            WHERE id = $1
            RETURNING id, phone, name, email, role, loyalty_points,
                      country, state, address, is_active, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(update.name)
        .bind(update.email)
        .bind(update.password_hash)
        .bind(update.role)
        .bind(update.loyalty_points)
        .bind(update.is_active)
        .bind(update.country)
        .bind(update.state)
        .bind(update.address)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::on_check(e, "loyalty points cannot go negative"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Update a user's own profile fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn update_profile(
        &self,
        id: UserId,
        name: Option<&str>,
        email: Option<&str>,
        country: Option<&str>,
        state: Option<&str>,
        address: Option<&str>,
    ) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            r"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                country = COALESCE($4, country),
                state = COALESCE($5, state),
                address = COALESCE($6, address),
                updated_at = now()
            WHERE id = $1
            RETURNING id, phone, name, email, role, loyalty_points,
                      country, state, address, is_active, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(country)
        .bind(state)
        .bind(address)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Add (or with a negative delta, remove) loyalty points.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Conflict` if the balance would go negative.
    pub async fn add_loyalty_points(
        &self,
        id: UserId,
        delta: i32,
    ) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            r"
            UPDATE users
            SET loyalty_points = loyalty_points + $2,
                updated_at = now()
            WHERE id = $1
            RETURNING id, phone, name, email, role, loyalty_points,
                      country, state, address, is_active, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::on_check(e, "loyalty points cannot go negative"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a user.
    ///
    /// # Returns
    ///
    /// Returns `true` if the user was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
