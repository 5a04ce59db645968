//! Submission service

use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    constants::FIRST_QUESTION_ID,
    db::repositories::{SubmissionRepository, UserRepository},
    error::AppResult,
    models::{Exercise, GradeRow, Submission, SubmissionRanking, User},
    utils::{from_epoch_millis, to_epoch_millis},
};

/// Submission service for storing and ranking graded submissions
pub struct SubmissionService;

impl SubmissionService {
    /// Store a submission together with its grades as one unit of work
    ///
    /// The submitting user is provisioned on the fly: an unknown username gets a
    /// new, password-less user row. A submission with the unassigned id is
    /// inserted; otherwise the row with that id is updated in place. All prior
    /// grades of the submission are replaced. The final id is assigned back
    /// onto `submission`.
    pub async fn store_submission(pool: &SqlitePool, submission: &mut Submission) -> AppResult<i64> {
        submission.check_grade_count()?;
        submission.user.validate()?;

        let submission_time_ms = to_epoch_millis(submission.submission_time);
        let mut tx = pool.begin().await?;

        let user_id = UserRepository::ensure_identity(&mut tx, &submission.user).await?;

        let submission_id = if submission.is_persisted() {
            SubmissionRepository::upsert_with_id(
                &mut tx,
                submission.id,
                user_id,
                submission.exercise.id,
                submission_time_ms,
            )
            .await?;
            submission.id
        } else {
            SubmissionRepository::insert(&mut tx, user_id, submission.exercise.id, submission_time_ms)
                .await?
        };

        let replaced = SubmissionRepository::delete_grades(&mut tx, submission_id).await?;
        SubmissionRepository::insert_grades(&mut tx, submission_id, &submission.question_grades)
            .await?;

        tx.commit().await?;

        if replaced > 0 {
            tracing::info!(
                "Regraded submission {} ({} grades replaced)",
                submission_id,
                replaced
            );
        } else {
            tracing::info!(
                "Stored submission {} of {} for exercise {}",
                submission_id,
                submission.user.username,
                submission.exercise.id
            );
        }

        submission.user.id = user_id;
        submission.id = submission_id;
        Ok(submission_id)
    }

    /// Most recent submission of a user for an exercise
    pub async fn get_last_submission(
        pool: &SqlitePool,
        user: &User,
        exercise: &Exercise,
    ) -> AppResult<Option<Submission>> {
        Self::get_ranked_submission(pool, user, exercise, SubmissionRanking::Latest).await
    }

    /// Submission of a user for an exercise with the highest grade total
    ///
    /// Among equal totals the most recent submission wins.
    pub async fn get_best_submission(
        pool: &SqlitePool,
        user: &User,
        exercise: &Exercise,
    ) -> AppResult<Option<Submission>> {
        Self::get_ranked_submission(pool, user, exercise, SubmissionRanking::Best).await
    }

    /// Rank the user's submissions for the exercise, then fetch the winner's grades
    pub async fn get_ranked_submission(
        pool: &SqlitePool,
        user: &User,
        exercise: &Exercise,
        ranking: SubmissionRanking,
    ) -> AppResult<Option<Submission>> {
        let mut conn = pool.acquire().await?;

        let Some(winner) =
            SubmissionRepository::rank(&mut conn, ranking, &user.username, exercise.id).await?
        else {
            tracing::debug!(
                "No {} submission of {} for exercise {}",
                ranking,
                user.username,
                exercise.id
            );
            return Ok(None);
        };

        let question_count = exercise.question_count();
        let rows =
            SubmissionRepository::fetch_grades(&mut conn, winner.id, question_count as i64).await?;

        let mut owner = user.clone();
        owner.id = winner.user_id;

        Ok(Some(Submission {
            id: winner.id,
            user: owner,
            exercise: exercise.clone(),
            submission_time: from_epoch_millis(winner.submission_time)?,
            question_grades: align_grades(rows, question_count),
        }))
    }

    /// Number of grade rows stored for a submission
    pub async fn count_grades(pool: &SqlitePool, submission_id: i64) -> AppResult<i64> {
        let mut conn = pool.acquire().await?;
        SubmissionRepository::count_grades(&mut conn, submission_id).await
    }
}

/// Place grade rows at their question's position
///
/// Questions without a stored grade count as 0.0, so the result always has one
/// entry per question.
fn align_grades(rows: Vec<GradeRow>, question_count: usize) -> Vec<f64> {
    let mut grades = vec![0.0; question_count];

    for row in rows {
        let Some(index) = row
            .question_id
            .checked_sub(FIRST_QUESTION_ID)
            .and_then(|offset| usize::try_from(offset).ok())
        else {
            continue;
        };
        if let Some(slot) = grades.get_mut(index) {
            *slot = row.grade.unwrap_or_default();
        }
    }

    grades
}
