//! User repository

use sqlx::SqliteConnection;

use crate::{
    error::AppResult,
    models::{User, UserRow},
};

/// Repository for user database operations
pub struct UserRepository;

impl UserRepository {
    /// Insert a new user and return its generated id
    ///
    /// A `None` password leaves the user unable to log in.
    pub async fn insert(
        conn: &mut SqliteConnection,
        user: &User,
        password: Option<&str>,
    ) -> AppResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO User (Username, Firstname, Lastname, Password)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING UserId
            "#,
        )
        .bind(&user.username)
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(password)
        .fetch_one(&mut *conn)
        .await?;

        Ok(id)
    }

    /// Find user id by username
    pub async fn find_id_by_username(
        conn: &mut SqliteConnection,
        username: &str,
    ) -> AppResult<Option<i64>> {
        let id: Option<i64> = sqlx::query_scalar(r#"SELECT UserId FROM User WHERE Username = ?1"#)
            .bind(username)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(id)
    }

    /// Find user by username
    pub async fn find_by_username(
        conn: &mut SqliteConnection,
        username: &str,
    ) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT UserId AS id, Username AS username, Firstname AS firstname, Lastname AS lastname
            FROM User
            WHERE Username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row.map(User::from))
    }

    /// Stored password of a user, `None` when the user is unknown or has none
    pub async fn find_password(
        conn: &mut SqliteConnection,
        username: &str,
    ) -> AppResult<Option<String>> {
        let password: Option<Option<String>> =
            sqlx::query_scalar(r#"SELECT Password FROM User WHERE Username = ?1"#)
                .bind(username)
                .fetch_optional(&mut *conn)
                .await?;

        Ok(password.flatten())
    }

    /// Overwrite names and password of an existing user
    pub async fn update_credentials(
        conn: &mut SqliteConnection,
        id: i64,
        user: &User,
        password: &str,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE User
            SET Password = ?1, Firstname = ?2, Lastname = ?3
            WHERE UserId = ?4
            "#,
        )
        .bind(password)
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(id)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Overwrite names of an existing user, leaving the password untouched
    pub async fn update_names(conn: &mut SqliteConnection, id: i64, user: &User) -> AppResult<()> {
        sqlx::query(r#"UPDATE User SET Firstname = ?1, Lastname = ?2 WHERE UserId = ?3"#)
            .bind(&user.firstname)
            .bind(&user.lastname)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Insert the user, or update names and password of the row with the same username
    pub async fn upsert(conn: &mut SqliteConnection, user: &User, password: &str) -> AppResult<i64> {
        match Self::find_id_by_username(conn, &user.username).await? {
            Some(id) => {
                Self::update_credentials(conn, id, user, password).await?;
                Ok(id)
            }
            None => Self::insert(conn, user, Some(password)).await,
        }
    }

    /// Get-or-create the identity of a user without touching an existing password
    pub async fn ensure_identity(conn: &mut SqliteConnection, user: &User) -> AppResult<i64> {
        match Self::find_id_by_username(conn, &user.username).await? {
            Some(id) => {
                Self::update_names(conn, id, user).await?;
                Ok(id)
            }
            None => Self::insert(conn, user, None).await,
        }
    }

    /// Count total users
    pub async fn count(conn: &mut SqliteConnection) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM User"#)
            .fetch_one(&mut *conn)
            .await?;

        Ok(count)
    }
}
