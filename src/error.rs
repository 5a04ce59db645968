//! Custom error types and handling
//!
//! This module defines the store's error type and its conversions from
//! the storage, validation and configuration layers.

use crate::config::ConfigError;

/// Store-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Resource errors
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    #[error("Store is closed")]
    StoreClosed,

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

impl AppError {
    /// Whether the error stems from the caller's input rather than the store
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::AlreadyExists(_))
    }
}

// Implement From for common error types
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed => AppError::StoreClosed,
            sqlx::Error::Database(db_err) => {
                // Check for unique constraint violations
                if db_err.is_unique_violation() {
                    AppError::AlreadyExists(db_err.message().to_string())
                } else {
                    AppError::Database(db_err.to_string())
                }
            }
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
