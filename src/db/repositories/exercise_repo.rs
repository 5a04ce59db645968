//! Exercise repository

use std::collections::HashMap;

use sqlx::SqliteConnection;

use crate::{
    constants::FIRST_QUESTION_ID,
    error::{AppError, AppResult},
    models::{Exercise, ExerciseRow, Question, QuestionRow},
    utils::{from_epoch_millis, to_epoch_millis},
};

/// Repository for exercise and question database operations
pub struct ExerciseRepository;

impl ExerciseRepository {
    /// Check whether an exercise with this id is stored
    pub async fn exists(conn: &mut SqliteConnection, id: i64) -> AppResult<bool> {
        let found: Option<i64> =
            sqlx::query_scalar(r#"SELECT ExerciseId FROM Exercise WHERE ExerciseId = ?1"#)
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

        Ok(found.is_some())
    }

    /// Insert the exercise row
    pub async fn insert(conn: &mut SqliteConnection, exercise: &Exercise) -> AppResult<()> {
        sqlx::query(r#"INSERT INTO Exercise (ExerciseId, Name, DueDate) VALUES (?1, ?2, ?3)"#)
            .bind(exercise.id)
            .bind(&exercise.name)
            .bind(to_epoch_millis(exercise.due_date))
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Insert the questions of an exercise, numbered from 1 in order
    pub async fn insert_questions(
        conn: &mut SqliteConnection,
        exercise_id: i64,
        questions: &[Question],
    ) -> AppResult<()> {
        for (question_id, question) in (FIRST_QUESTION_ID..).zip(questions) {
            sqlx::query(
                r#"
                INSERT INTO Question (ExerciseId, QuestionId, Name, "Desc", Points)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(exercise_id)
            .bind(question_id)
            .bind(&question.name)
            .bind(&question.description)
            .bind(i64::from(question.points))
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Load all exercises ordered by id, each with its questions in QuestionId order
    pub async fn load_all(conn: &mut SqliteConnection) -> AppResult<Vec<Exercise>> {
        let rows = sqlx::query_as::<_, ExerciseRow>(
            r#"
            SELECT ExerciseId AS id, Name AS name, DueDate AS due_date
            FROM Exercise
            ORDER BY ExerciseId ASC
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        let question_rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT
                ExerciseId AS exercise_id,
                QuestionId AS question_id,
                Name AS name,
                "Desc" AS description,
                Points AS points
            FROM Question
            ORDER BY ExerciseId ASC, QuestionId ASC
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        let mut questions: HashMap<i64, Vec<Question>> = HashMap::new();
        for row in question_rows {
            let points = u32::try_from(row.points).map_err(|_| {
                AppError::CorruptRecord(format!(
                    "question {} of exercise {} has invalid points {}",
                    row.question_id, row.exercise_id, row.points
                ))
            })?;
            questions.entry(row.exercise_id).or_default().push(Question {
                name: row.name.unwrap_or_default(),
                description: row.description.unwrap_or_default(),
                points,
            });
        }

        rows.into_iter()
            .map(|row| -> AppResult<Exercise> {
                Ok(Exercise {
                    id: row.id,
                    name: row.name.unwrap_or_default(),
                    due_date: from_epoch_millis(row.due_date)?,
                    questions: questions.remove(&row.id).unwrap_or_default(),
                })
            })
            .collect()
    }

    /// Number of questions stored for an exercise
    pub async fn count_questions(conn: &mut SqliteConnection, exercise_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM Question WHERE ExerciseId = ?1"#)
            .bind(exercise_id)
            .fetch_one(&mut *conn)
            .await?;

        Ok(count)
    }

    /// Count total exercises
    pub async fn count(conn: &mut SqliteConnection) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM Exercise"#)
            .fetch_one(&mut *conn)
            .await?;

        Ok(count)
    }
}
