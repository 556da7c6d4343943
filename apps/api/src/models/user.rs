//! User account models

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// User account from the users table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,

    /// Name chosen at registration
    pub username: String,

    /// Email address (unique, stored lowercased)
    pub email: String,

    /// Optional phone number
    pub phone: Option<String>,

    /// URL of the profile photo
    pub profile_photo: Option<String>,

    /// Argon2id hashed password
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Validated registration data, ready to insert
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub profile_photo: Option<String>,
    pub password_hash: String,
}
