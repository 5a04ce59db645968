//! Business logic services
//!
//! Services own the unit-of-work boundaries: every multi-statement write runs
//! inside one transaction, and repositories are called with that transaction.

pub mod exercise_service;
pub mod submission_service;
pub mod user_service;

pub use exercise_service::ExerciseService;
pub use submission_service::SubmissionService;
pub use user_service::UserService;
