//! Schema management
//!
//! Creates the five relations of the store. Every statement is
//! `CREATE TABLE IF NOT EXISTS`, so running it against a conformant
//! database changes nothing.

use sqlx::SqlitePool;

use crate::error::AppResult;

/// Table definitions in creation order
const SCHEMA: &[(&str, &str)] = &[
    (
        "User",
        r#"
        CREATE TABLE IF NOT EXISTS User (
            UserId INTEGER PRIMARY KEY,
            Username TEXT UNIQUE,
            Firstname TEXT,
            Lastname TEXT,
            Password TEXT
        )
        "#,
    ),
    (
        "Exercise",
        r#"
        CREATE TABLE IF NOT EXISTS Exercise (
            ExerciseId INTEGER PRIMARY KEY,
            Name TEXT,
            DueDate INTEGER
        )
        "#,
    ),
    (
        "Question",
        r#"
        CREATE TABLE IF NOT EXISTS Question (
            ExerciseId INTEGER,
            QuestionId INTEGER,
            Name TEXT,
            "Desc" TEXT,
            Points INTEGER,
            PRIMARY KEY (ExerciseId, QuestionId)
        )
        "#,
    ),
    (
        "Submission",
        r#"
        CREATE TABLE IF NOT EXISTS Submission (
            SubmissionId INTEGER PRIMARY KEY,
            UserId INTEGER,
            ExerciseId INTEGER,
            SubmissionTime INTEGER
        )
        "#,
    ),
    (
        "QuestionGrade",
        r#"
        CREATE TABLE IF NOT EXISTS QuestionGrade (
            SubmissionId INTEGER,
            QuestionId INTEGER,
            Grade REAL,
            PRIMARY KEY (SubmissionId, QuestionId)
        )
        "#,
    ),
];

/// Names of the tables the store relies on
pub fn table_names() -> impl Iterator<Item = &'static str> {
    SCHEMA.iter().map(|(name, _)| *name)
}

/// Create all tables that do not exist yet
pub async fn ensure_schema(pool: &SqlitePool) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    for (table, ddl) in SCHEMA {
        tracing::debug!("Ensuring table {} exists", table);
        sqlx::query(*ddl).execute(&mut *tx).await?;
    }

    tx.commit().await?;
    Ok(())
}
