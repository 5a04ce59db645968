//! Time utilities
//!
//! Timestamps are kept as `DateTime<Utc>` in memory and as epoch
//! milliseconds in the store.

use chrono::{DateTime, Utc};

use crate::error::{AppError, AppResult};

/// Convert a timestamp to the store's epoch-millisecond representation
pub fn to_epoch_millis(dt: DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}

/// Convert a stored epoch-millisecond value back to a timestamp
pub fn from_epoch_millis(ms: i64) -> AppResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| AppError::CorruptRecord(format!("timestamp {} is out of range", ms)))
}
