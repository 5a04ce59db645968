//! Database repositories
//!
//! Repositories handle all direct database interactions. They operate on a
//! borrowed connection so that services can run several of them inside one
//! transaction.

pub mod exercise_repo;
pub mod submission_repo;
pub mod user_repo;

pub use exercise_repo::ExerciseRepository;
pub use submission_repo::SubmissionRepository;
pub use user_repo::UserRepository;
