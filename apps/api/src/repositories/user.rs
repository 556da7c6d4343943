//! User repository for centralized database operations

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{NewUser, User};

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by their unique ID
    ///
    /// # Returns
    /// * `Ok(Some(User))` - If the user exists
    /// * `Ok(None)` - If no user with the given ID exists
    /// * `Err(sqlx::Error)` - If a database error occurs
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, phone, profile_photo, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a user by their email address (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, phone, profile_photo, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await
    }

    /// Check if an email address is already registered (case-insensitive)
    pub async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)"#)
            .bind(email.trim().to_lowercase())
            .fetch_one(&self.pool)
            .await
    }

    /// Insert a new user
    ///
    /// # Returns
    /// * `Ok(User)` - The newly created user
    /// * `Err(sqlx::Error)` - If a database error occurs (including a unique
    ///   violation on `email`)
    pub async fn create(&self, new_user: &NewUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, phone, profile_photo, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, phone, profile_photo, password_hash, created_at, updated_at
            "#,
        )
        .bind(&new_user.username)
        .bind(new_user.email.trim().to_lowercase())
        .bind(&new_user.phone)
        .bind(&new_user.profile_photo)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await
    }
}
