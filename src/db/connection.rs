//! Database connection management

use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::{config::DatabaseConfig, error::AppResult};

/// Prefix of store locations written as JDBC URLs
const JDBC_PREFIX: &str = "jdbc:";

/// Translate a store location into SQLite connect options
///
/// Accepts `sqlite:` URLs, `jdbc:sqlite:` URLs and bare file paths. The
/// database file is created when missing.
pub fn connect_options(url: &str) -> AppResult<SqliteConnectOptions> {
    let url = url.strip_prefix(JDBC_PREFIX).unwrap_or(url);

    let options = if url.starts_with("sqlite:") {
        SqliteConnectOptions::from_str(url)?
    } else {
        SqliteConnectOptions::new().filename(url)
    };

    Ok(options.create_if_missing(true))
}

/// Create a new database connection pool
///
/// Connections are kept alive for the pool's lifetime so that in-memory
/// stores survive between operations.
pub async fn create_pool(config: &DatabaseConfig) -> AppResult<SqlitePool> {
    let options = connect_options(&config.url)?.busy_timeout(config.busy_timeout());

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Test database connection
pub async fn test_connection(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
