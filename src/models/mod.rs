//! Domain models
//!
//! In-memory representations of the store's entities.

pub mod exercise;
pub mod submission;
pub mod user;

pub use exercise::*;
pub use submission::*;
pub use user::*;
