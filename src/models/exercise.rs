//! Exercise model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An exercise made of weighted questions
///
/// The position of a question defines its 1-based QuestionId in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Caller-supplied key
    pub id: i64,
    pub name: String,
    pub due_date: DateTime<Utc>,
    pub questions: Vec<Question>,
}

/// A single weighted question, owned by its exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub name: String,
    pub description: String,
    pub points: u32,
}

impl Exercise {
    pub fn new(id: i64, name: impl Into<String>, due_date: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            due_date,
            questions: Vec::new(),
        }
    }

    /// Append a question; it receives the next QuestionId
    pub fn add_question(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        points: u32,
    ) -> &mut Self {
        self.questions.push(Question {
            name: name.into(),
            description: description.into(),
            points,
        });
        self
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Sum of the points of all questions
    pub fn total_points(&self) -> u64 {
        self.questions.iter().map(|q| u64::from(q.points)).sum()
    }
}

/// Outcome of registering an exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseRegistration {
    /// The exercise and its questions were inserted
    Added(i64),
    /// An exercise with this id already exists; nothing was written
    AlreadyExists,
}

impl ExerciseRegistration {
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added(_))
    }
}

/// Row shape of the `Exercise` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct ExerciseRow {
    pub id: i64,
    pub name: Option<String>,
    pub due_date: i64,
}

/// Row shape of the `Question` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct QuestionRow {
    pub exercise_id: i64,
    pub question_id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub points: i64,
}
