//! Session repository for centralized database operations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::session::Session;

/// Repository for session database operations
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new SessionRepository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new session record
    ///
    /// # Arguments
    /// * `session_id` - Pre-generated UUID for the session
    /// * `user_id` - ID of the user who owns this session
    /// * `expires_at` - Session expiration timestamp
    pub async fn create(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, sqlx::Error> {
        sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, user_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, expires_at, created_at
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
    }

    /// Find a session that has not yet expired
    ///
    /// # Returns
    /// * `Ok(Some(Session))` - If a live session exists
    /// * `Ok(None)` - If the session is unknown or expired
    /// * `Err(sqlx::Error)` - If a database error occurs
    pub async fn find_live(&self, session_id: Uuid) -> Result<Option<Session>, sqlx::Error> {
        sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, expires_at, created_at
            FROM sessions
            WHERE id = $1 AND expires_at > NOW()
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a single session (logout)
    ///
    /// # Returns
    /// * `Ok(true)` - If the session was deleted
    /// * `Ok(false)` - If no session with the given ID exists
    pub async fn delete(&self, session_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete expired sessions
    ///
    /// # Arguments
    /// * `batch_size` - Maximum number of sessions to delete per call (prevents long locks)
    ///
    /// # Returns
    /// * `Ok(u64)` - The number of expired sessions that were deleted
    pub async fn delete_expired(&self, batch_size: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE id IN (
                SELECT id FROM sessions
                WHERE expires_at <= NOW()
                LIMIT $1
            )
            "#,
        )
        .bind(batch_size)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
