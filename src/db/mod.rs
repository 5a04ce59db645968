//! Database module
//!
//! This module handles the store connection, schema creation, and repositories.

pub mod connection;
pub mod repositories;
pub mod schema;

pub use connection::*;
pub use schema::ensure_schema;
