//! Utility functions

pub mod time;

pub use time::{from_epoch_millis, to_epoch_millis};
