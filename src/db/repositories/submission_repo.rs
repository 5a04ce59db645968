//! Submission repository
//!
//! Retrieval is rank-then-fetch: [`SubmissionRepository::rank`] picks the one
//! winning submission of a user/exercise pair according to a
//! [`SubmissionRanking`], and [`SubmissionRepository::fetch_grades`] returns the
//! grade rows of whichever submission won.

use sqlx::SqliteConnection;

use crate::{
    constants::FIRST_QUESTION_ID,
    error::AppResult,
    models::{GradeRow, SubmissionRanking, SubmissionRow},
};

/// Repository for submission and grade database operations
pub struct SubmissionRepository;

impl SubmissionRepository {
    /// Insert a new submission and return its generated id
    pub async fn insert(
        conn: &mut SqliteConnection,
        user_id: i64,
        exercise_id: i64,
        submission_time_ms: i64,
    ) -> AppResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO Submission (UserId, ExerciseId, SubmissionTime)
            VALUES (?1, ?2, ?3)
            RETURNING SubmissionId
            "#,
        )
        .bind(user_id)
        .bind(exercise_id)
        .bind(submission_time_ms)
        .fetch_one(&mut *conn)
        .await?;

        Ok(id)
    }

    /// Update the submission with this id in place, creating it when absent
    pub async fn upsert_with_id(
        conn: &mut SqliteConnection,
        id: i64,
        user_id: i64,
        exercise_id: i64,
        submission_time_ms: i64,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO Submission (SubmissionId, UserId, ExerciseId, SubmissionTime)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(SubmissionId) DO UPDATE SET
                UserId = excluded.UserId,
                ExerciseId = excluded.ExerciseId,
                SubmissionTime = excluded.SubmissionTime
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(exercise_id)
        .bind(submission_time_ms)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Delete every grade of a submission, returning how many were removed
    pub async fn delete_grades(conn: &mut SqliteConnection, submission_id: i64) -> AppResult<u64> {
        let result = sqlx::query(r#"DELETE FROM QuestionGrade WHERE SubmissionId = ?1"#)
            .bind(submission_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Insert one grade row per entry, QuestionId = index + 1
    pub async fn insert_grades(
        conn: &mut SqliteConnection,
        submission_id: i64,
        grades: &[f64],
    ) -> AppResult<()> {
        for (question_id, grade) in (FIRST_QUESTION_ID..).zip(grades) {
            sqlx::query(
                r#"INSERT INTO QuestionGrade (SubmissionId, QuestionId, Grade) VALUES (?1, ?2, ?3)"#,
            )
            .bind(submission_id)
            .bind(question_id)
            .bind(*grade)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Number of grade rows stored for a submission
    pub async fn count_grades(conn: &mut SqliteConnection, submission_id: i64) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM QuestionGrade WHERE SubmissionId = ?1"#)
                .bind(submission_id)
                .fetch_one(&mut *conn)
                .await?;

        Ok(count)
    }

    /// Select the winning submission of a user/exercise pair
    pub(crate) async fn rank(
        conn: &mut SqliteConnection,
        ranking: SubmissionRanking,
        username: &str,
        exercise_id: i64,
    ) -> AppResult<Option<SubmissionRow>> {
        let row = sqlx::query_as::<_, SubmissionRow>(ranking_query(ranking))
            .bind(username)
            .bind(exercise_id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(row)
    }

    /// Grade rows of a submission in ascending QuestionId order
    pub(crate) async fn fetch_grades(
        conn: &mut SqliteConnection,
        submission_id: i64,
        limit: i64,
    ) -> AppResult<Vec<GradeRow>> {
        let rows = sqlx::query_as::<_, GradeRow>(
            r#"
            SELECT g.QuestionId AS question_id, g.Grade AS grade
            FROM Submission s
            INNER JOIN QuestionGrade g ON g.SubmissionId = s.SubmissionId
            WHERE s.SubmissionId = ?1
            ORDER BY g.QuestionId ASC
            LIMIT ?2
            "#,
        )
        .bind(submission_id)
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows)
    }
}

/// Ranking statement for each ranking; parameters are username and exercise id
fn ranking_query(ranking: SubmissionRanking) -> &'static str {
    match ranking {
        SubmissionRanking::Latest => {
            r#"
            SELECT s.SubmissionId AS id, s.UserId AS user_id, s.SubmissionTime AS submission_time
            FROM Submission s
            INNER JOIN User u ON u.UserId = s.UserId
            WHERE u.Username = ?1 AND s.ExerciseId = ?2
            ORDER BY s.SubmissionTime DESC, s.SubmissionId DESC
            LIMIT 1
            "#
        }
        SubmissionRanking::Best => {
            r#"
            SELECT s.SubmissionId AS id, s.UserId AS user_id, s.SubmissionTime AS submission_time
            FROM Submission s
            INNER JOIN User u ON u.UserId = s.UserId
            LEFT JOIN QuestionGrade g ON g.SubmissionId = s.SubmissionId
            WHERE u.Username = ?1 AND s.ExerciseId = ?2
            GROUP BY s.SubmissionId, s.UserId, s.SubmissionTime
            ORDER BY COALESCE(SUM(g.Grade), 0) DESC, s.SubmissionTime DESC, s.SubmissionId DESC
            LIMIT 1
            "#
        }
    }
}
