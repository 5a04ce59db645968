//! The gradebook handle
//!
//! [`Gradebook`] owns the connection to one store. Opening it creates the
//! store if needed and ensures the schema; closing it releases the
//! connection, after which every operation fails with
//! [`AppError::StoreClosed`](crate::error::AppError::StoreClosed).

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::{
    config::DatabaseConfig,
    db,
    error::AppResult,
    models::{Exercise, ExerciseRegistration, Submission, User},
    services::{ExerciseService, SubmissionService, UserService},
};

/// Handle to an open grading-record store
#[derive(Clone)]
pub struct Gradebook {
    inner: Arc<GradebookInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct GradebookInner {
    /// Database connection pool
    db: SqlitePool,

    /// Configuration the store was opened with
    config: DatabaseConfig,
}

impl Gradebook {
    /// Open the store at `url`, creating it and its tables when missing
    pub async fn open(url: &str) -> AppResult<Self> {
        Self::connect(&DatabaseConfig::for_url(url)).await
    }

    /// Open the store described by `config`
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let pool = db::create_pool(config).await?;
        db::ensure_schema(&pool).await?;

        tracing::info!("Opened gradebook at {}", config.url);

        Ok(Self {
            inner: Arc::new(GradebookInner {
                db: pool,
                config: config.clone(),
            }),
        })
    }

    /// Close the store; clones of this handle are closed as well
    pub async fn close(&self) {
        if !self.inner.db.is_closed() {
            self.inner.db.close().await;
            tracing::info!("Closed gradebook at {}", self.inner.config.url);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.db.is_closed()
    }

    /// Get a reference to the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &DatabaseConfig {
        &self.inner.config
    }

    // =========== Users =============

    /// Add a user, or update names and password of the user with the same username
    pub async fn upsert_user(&self, user: &mut User, password: &str) -> AppResult<i64> {
        UserService::upsert_user(self.db(), user, password).await
    }

    /// Check a username/password pair (plain-text comparison)
    pub async fn verify_login(&self, username: &str, password: &str) -> AppResult<bool> {
        UserService::verify_login(self.db(), username, password).await
    }

    pub async fn find_user(&self, username: &str) -> AppResult<Option<User>> {
        UserService::find_user(self.db(), username).await
    }

    // =========== Exercises =============

    /// Register an exercise; an existing id yields `ExerciseRegistration::AlreadyExists`
    pub async fn add_exercise(&self, exercise: &Exercise) -> AppResult<ExerciseRegistration> {
        ExerciseService::add_exercise(self.db(), exercise).await
    }

    /// All exercises ordered by id
    pub async fn load_exercises(&self) -> AppResult<Vec<Exercise>> {
        ExerciseService::load_exercises(self.db()).await
    }

    pub async fn count_exercises(&self) -> AppResult<i64> {
        ExerciseService::count_exercises(self.db()).await
    }

    // =========== Submissions =============

    /// Store a submission and its grades, provisioning the submitting user
    pub async fn store_submission(&self, submission: &mut Submission) -> AppResult<i64> {
        SubmissionService::store_submission(self.db(), submission).await
    }

    /// Most recent submission, `None` when the user never submitted the exercise
    pub async fn get_last_submission(
        &self,
        user: &User,
        exercise: &Exercise,
    ) -> AppResult<Option<Submission>> {
        SubmissionService::get_last_submission(self.db(), user, exercise).await
    }

    /// Highest-total submission, `None` when the user never submitted the exercise
    pub async fn get_best_submission(
        &self,
        user: &User,
        exercise: &Exercise,
    ) -> AppResult<Option<Submission>> {
        SubmissionService::get_best_submission(self.db(), user, exercise).await
    }

    pub async fn count_grades(&self, submission_id: i64) -> AppResult<i64> {
        SubmissionService::count_grades(self.db(), submission_id).await
    }
}
