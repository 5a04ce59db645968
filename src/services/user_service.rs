//! User service

use sqlx::SqlitePool;
use validator::Validate;

use crate::{db::repositories::UserRepository, error::AppResult, models::User};

/// User service for identity and credential logic
pub struct UserService;

impl UserService {
    /// Add a user or update the one with the same username
    ///
    /// The resulting id is assigned back onto `user`.
    pub async fn upsert_user(pool: &SqlitePool, user: &mut User, password: &str) -> AppResult<i64> {
        user.validate()?;

        let mut tx = pool.begin().await?;
        let id = UserRepository::upsert(&mut tx, user, password).await?;
        tx.commit().await?;

        tracing::info!("Stored user {} with id {}", user.username, id);
        user.id = id;
        Ok(id)
    }

    /// Check a username/password pair
    ///
    /// Passwords are compared in plain text. This is not a secure way to
    /// check credentials; hashing is out of scope for this store.
    pub async fn verify_login(pool: &SqlitePool, username: &str, password: &str) -> AppResult<bool> {
        let mut conn = pool.acquire().await?;
        let stored = UserRepository::find_password(&mut conn, username).await?;

        let valid = stored.is_some_and(|stored| stored == password);
        if !valid {
            tracing::debug!("Rejected login for {}", username);
        }
        Ok(valid)
    }

    /// Get user by username
    pub async fn find_user(pool: &SqlitePool, username: &str) -> AppResult<Option<User>> {
        let mut conn = pool.acquire().await?;
        UserRepository::find_by_username(&mut conn, username).await
    }
}
