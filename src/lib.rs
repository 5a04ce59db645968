//! Gradebook - Embedded Grading-Record Store
//!
//! This library keeps track of users, exercises made of weighted questions,
//! and graded submissions, and answers which submission of a user is the
//! latest and which one is the best.
//!
//! # Architecture
//!
//! The crate follows a layered architecture:
//! - **Gradebook**: the open/close handle callers work with
//! - **Services**: units of work, validation and logging
//! - **Repositories**: Database access
//! - **Models**: Domain models
//!
//! ```no_run
//! use gradebook::{Gradebook, models::User};
//!
//! # async fn run() -> gradebook::AppResult<()> {
//! let book = Gradebook::open("sqlite://grades.db").await?;
//! let mut user = User::new("ada", "Ada", "Lovelace");
//! book.upsert_user(&mut user, "analytical").await?;
//! assert!(book.verify_login("ada", "analytical").await?);
//! book.close().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod gradebook;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use gradebook::Gradebook;
