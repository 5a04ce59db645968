//! Exercise service

use sqlx::SqlitePool;

use crate::{
    db::repositories::ExerciseRepository,
    error::{AppError, AppResult},
    models::{Exercise, ExerciseRegistration},
};

/// Exercise service for registration and loading
pub struct ExerciseService;

impl ExerciseService {
    /// Register an exercise and its questions as one unit of work
    ///
    /// An existing exercise id is reported as `AlreadyExists` and nothing is
    /// written. Any other failure rolls the whole registration back.
    pub async fn add_exercise(pool: &SqlitePool, exercise: &Exercise) -> AppResult<ExerciseRegistration> {
        let mut tx = pool.begin().await?;

        if ExerciseRepository::exists(&mut tx, exercise.id).await? {
            tracing::warn!("Exercise {} is already registered", exercise.id);
            return Ok(ExerciseRegistration::AlreadyExists);
        }

        match ExerciseRepository::insert(&mut tx, exercise).await {
            Ok(()) => {}
            Err(AppError::AlreadyExists(_)) => {
                tracing::warn!("Exercise {} was registered concurrently", exercise.id);
                return Ok(ExerciseRegistration::AlreadyExists);
            }
            Err(e) => return Err(e),
        }
        // The exercise row is new, so a clashing question key is leftover data
        ExerciseRepository::insert_questions(&mut tx, exercise.id, &exercise.questions)
            .await
            .map_err(|e| match e {
                AppError::AlreadyExists(msg) => AppError::Database(msg),
                other => other,
            })?;

        tx.commit().await?;

        tracing::info!(
            "Registered exercise {} with {} questions",
            exercise.id,
            exercise.question_count()
        );
        Ok(ExerciseRegistration::Added(exercise.id))
    }

    /// All exercises ordered by id, each with its questions in order
    pub async fn load_exercises(pool: &SqlitePool) -> AppResult<Vec<Exercise>> {
        let mut conn = pool.acquire().await?;
        let exercises = ExerciseRepository::load_all(&mut conn).await?;

        tracing::debug!("Loaded {} exercises", exercises.len());
        Ok(exercises)
    }

    /// Count registered exercises
    pub async fn count_exercises(pool: &SqlitePool) -> AppResult<i64> {
        let mut conn = pool.acquire().await?;
        ExerciseRepository::count(&mut conn).await
    }
}
