//! Server-side session model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Session record from the sessions table
///
/// The browser only ever holds the signed `id`.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    /// Unique session identifier
    pub id: Uuid,

    /// User who owns this session
    pub user_id: Uuid,

    /// Session expiration timestamp
    pub expires_at: DateTime<Utc>,

    /// Session creation timestamp
    pub created_at: DateTime<Utc>,
}
