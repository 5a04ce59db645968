//! Submission model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    constants::UNASSIGNED_ID,
    error::{AppError, AppResult},
    models::{Exercise, User},
};

/// A graded attempt of a user at an exercise
///
/// `question_grades[i]` is the grade for QuestionId `i + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Surrogate key, `UNASSIGNED_ID` until the submission has been persisted
    pub id: i64,
    pub user: User,
    pub exercise: Exercise,
    pub submission_time: DateTime<Utc>,
    pub question_grades: Vec<f64>,
}

impl Submission {
    /// Create a submission that has not been persisted yet
    pub fn new(
        user: User,
        exercise: Exercise,
        submission_time: DateTime<Utc>,
        question_grades: Vec<f64>,
    ) -> Self {
        Self {
            id: UNASSIGNED_ID,
            user,
            exercise,
            submission_time,
            question_grades,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_ID
    }

    /// Sum of all question grades
    pub fn total_grade(&self) -> f64 {
        self.question_grades.iter().sum()
    }

    /// Reject submissions whose grades do not line up with the exercise's questions
    pub fn check_grade_count(&self) -> AppResult<()> {
        let expected = self.exercise.question_count();
        if self.question_grades.len() != expected {
            return Err(AppError::Validation(format!(
                "submission has {} grades but exercise {} has {} questions",
                self.question_grades.len(),
                self.exercise.id,
                expected
            )));
        }
        Ok(())
    }
}

/// Which submission of a user/exercise pair a query selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionRanking {
    /// Most recent submission time
    Latest,
    /// Highest grade total, most recent first among equal totals
    Best,
}

impl std::fmt::Display for SubmissionRanking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::Best => write!(f, "best"),
        }
    }
}

/// Header row of a ranked submission
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct SubmissionRow {
    pub id: i64,
    pub user_id: i64,
    pub submission_time: i64,
}

/// One row of the `QuestionGrade` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct GradeRow {
    pub question_id: i64,
    pub grade: Option<f64>,
}
