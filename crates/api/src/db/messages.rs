//! Message repository.
//!
//! A message is either direct (has a receiver) or a broadcast visible to
//! every user. The inbox is the union of both.

use sqlx::PgPool;

use nabta_core::{MessageId, UserId};

use super::RepositoryError;
use crate::models::Message;

const MESSAGE_COLUMNS: &str = r"
    m.id, m.subject, m.content, m.sender_id, m.receiver_id, m.is_broadcast,
    m.is_read, m.created_at,
    s.name AS sender_name
";

/// Repository for message database operations.
pub struct MessageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MessageRepository<'a> {
    /// Create a new message repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// A user's inbox: direct messages plus broadcasts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn inbox(&self, user_id: UserId) -> Result<Vec<Message>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {MESSAGE_COLUMNS}
            FROM messages m
            LEFT JOIN users s ON s.id = m.sender_id
            WHERE m.receiver_id = $1 OR m.is_broadcast
            ORDER BY m.created_at DESC
            "
        );

        let messages = sqlx::query_as::<_, Message>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;

        Ok(messages)
    }

    /// Messages a user has sent, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sent(&self, user_id: UserId) -> Result<Vec<Message>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {MESSAGE_COLUMNS}
            FROM messages m
            LEFT JOIN users s ON s.id = m.sender_id
            WHERE m.sender_id = $1
            ORDER BY m.created_at DESC
            "
        );

        let messages = sqlx::query_as::<_, Message>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;

        Ok(messages)
    }

    /// Send a message. A broadcast has no receiver.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the receiver doesn't exist.
    pub async fn create(
        &self,
        sender_id: UserId,
        receiver_id: Option<UserId>,
        is_broadcast: bool,
        subject: &str,
        content: &str,
    ) -> Result<Message, RepositoryError> {
        let id: MessageId = sqlx::query_scalar(
            r"
            INSERT INTO messages (subject, content, sender_id, receiver_id, is_broadcast)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(subject)
        .bind(content)
        .bind(sender_id)
        .bind(receiver_id)
        .bind(is_broadcast)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        let sql = format!(
            r"
            SELECT {MESSAGE_COLUMNS}
            FROM messages m
            LEFT JOIN users s ON s.id = m.sender_id
            WHERE m.id = $1
            "
        );

        let message = sqlx::query_as::<_, Message>(&sql)
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        Ok(message)
    }

    /// Mark a direct message as read. Only the receiver can do this.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such message is addressed
    /// to the user.
    pub async fn mark_read(&self, id: MessageId, user_id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE messages
            SET is_read = TRUE
            WHERE id = $1 AND receiver_id = $2
            ",
        )
        .bind(id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
