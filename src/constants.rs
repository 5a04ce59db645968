//! Application-wide constants
//!
//! This module contains all constant values used throughout the store.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default store location when `DATABASE_URL` is not set
pub const DEFAULT_DATABASE_URL: &str = "sqlite://gradebook.db";

/// Default maximum connections in the pool (a single logical connection)
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 1;

/// Default time SQLite waits on a locked database before failing
pub const DEFAULT_DATABASE_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Default tracing filter
pub const DEFAULT_RUST_LOG: &str = "info";

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Sentinel id of a user or submission that has not been persisted yet
pub const UNASSIGNED_ID: i64 = -1;

/// QuestionId of the first question of an exercise
pub const FIRST_QUESTION_ID: i64 = 1;

// =============================================================================
// VALIDATION
// =============================================================================

/// Username minimum length; there is no upper bound
pub const MIN_USERNAME_LENGTH: u64 = 1;
