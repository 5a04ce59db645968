// tests/gradebook_tests.rs

use chrono::{DateTime, Utc};
use gradebook::{
    AppError, Gradebook,
    models::{Exercise, ExerciseRegistration, Submission, User},
};
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

/// Open a fresh gradebook in its own temporary directory.
/// The directory must outlive the gradebook, so it is returned alongside it.
async fn open_book() -> (TempDir, Gradebook) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite://{}", dir.path().join("grades.db").display());
    let book = Gradebook::open(&url).await.expect("Failed to open gradebook");
    (dir, book)
}

fn at(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap()
}

fn exercise(id: i64, questions: &[(&str, u32)]) -> Exercise {
    let mut exercise = Exercise::new(id, format!("Exercise {}", id), at(1_767_225_600_000));
    for (name, points) in questions {
        exercise.add_question(*name, format!("Describe {}", name), *points);
    }
    exercise
}

fn three_questions(id: i64) -> Exercise {
    exercise(id, &[("parse", 10), ("eval", 10), ("print", 10)])
}

async fn count(book: &Gradebook, sql: &str) -> i64 {
    sqlx::query_scalar(sql).fetch_one(book.db()).await.unwrap()
}

#[tokio::test]
async fn upsert_same_username_keeps_one_row_with_last_password() {
    // Arrange
    let (_dir, book) = open_book().await;
    let mut first = User::new("ada", "Ada", "Lovelace");
    let mut second = User::new("ada", "Augusta", "King");

    // Act
    let first_id = assert_ok!(book.upsert_user(&mut first, "engine").await);
    let second_id = assert_ok!(book.upsert_user(&mut second, "analytical").await);

    // Assert
    assert_eq!(first_id, second_id);
    assert_eq!(first.id, first_id);
    assert_eq!(second.id, first_id);
    assert_eq!(count(&book, "SELECT COUNT(*) FROM User").await, 1);
    assert!(assert_ok!(book.verify_login("ada", "analytical").await));
    assert!(!assert_ok!(book.verify_login("ada", "engine").await));

    let stored = assert_ok!(book.find_user("ada").await).unwrap();
    assert_eq!(stored.firstname, "Augusta");
}

#[tokio::test]
async fn verify_login_is_a_plain_text_comparison() {
    // Plain-text password storage is a known non-goal of this store; the test
    // pins the behaviour rather than endorsing it.
    let (_dir, book) = open_book().await;
    let mut user = User::new("grace", "Grace", "Hopper");
    assert_ok!(book.upsert_user(&mut user, "COBOL").await);

    assert!(assert_ok!(book.verify_login("grace", "COBOL").await));
    assert!(!assert_ok!(book.verify_login("grace", "cobol").await));
    assert!(!assert_ok!(book.verify_login("nobody", "COBOL").await));

    let stored: String = sqlx::query_scalar("SELECT Password FROM User WHERE Username = 'grace'")
        .fetch_one(book.db())
        .await
        .unwrap();
    assert_eq!(stored, "COBOL");
}

#[tokio::test]
async fn add_exercise_twice_reports_conflict() {
    let (_dir, book) = open_book().await;
    let original = three_questions(42);
    let mut duplicate = exercise(42, &[("other", 1)]);
    duplicate.name = "Impostor".to_string();

    assert_eq!(
        assert_ok!(book.add_exercise(&original).await),
        ExerciseRegistration::Added(42)
    );
    assert_eq!(
        assert_ok!(book.add_exercise(&duplicate).await),
        ExerciseRegistration::AlreadyExists
    );

    assert_eq!(count(&book, "SELECT COUNT(*) FROM Exercise").await, 1);
    assert_eq!(count(&book, "SELECT COUNT(*) FROM Question").await, 3);
    assert_eq!(assert_ok!(book.load_exercises().await), vec![original]);
}

#[tokio::test]
async fn load_exercises_orders_by_id_and_keeps_question_order() {
    let (_dir, book) = open_book().await;
    let three = exercise(3, &[("c1", 1), ("c2", 2)]);
    let one = exercise(1, &[("z", 5), ("a", 7), ("m", 9)]);
    let two = exercise(2, &[]);

    for exercise in [&three, &one, &two] {
        assert!(assert_ok!(book.add_exercise(exercise).await).is_added());
    }

    let loaded = assert_ok!(book.load_exercises().await);
    let ids: Vec<i64> = loaded.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(loaded, vec![one, two, three]);

    let names: Vec<&str> = loaded[0].questions.iter().map(|q| q.name.as_str()).collect();
    assert_eq!(names, vec!["z", "a", "m"]);
    assert_eq!(assert_ok!(book.count_exercises().await), 3);
}

#[tokio::test]
async fn latest_and_best_agree_when_later_submission_scores_higher() {
    let (_dir, book) = open_book().await;
    let ex = three_questions(1);
    assert_ok!(book.add_exercise(&ex).await);
    let user = User::new("linus", "Linus", "T");

    let mut early = Submission::new(user.clone(), ex.clone(), at(1_000), vec![1.0, 2.0, 3.0]);
    let mut late = Submission::new(user.clone(), ex.clone(), at(2_000), vec![4.0, 5.0, 6.0]);
    assert_ok!(book.store_submission(&mut early).await);
    let late_id = assert_ok!(book.store_submission(&mut late).await);

    let last = assert_ok!(book.get_last_submission(&user, &ex).await).unwrap();
    let best = assert_ok!(book.get_best_submission(&user, &ex).await).unwrap();

    assert_eq!(last.id, late_id);
    assert_eq!(best.id, late_id);
    assert_eq!(last.submission_time, at(2_000));
    assert_eq!(best.question_grades, vec![4.0, 5.0, 6.0]);
}

#[tokio::test]
async fn latest_and_best_differ_when_earlier_submission_scores_higher() {
    let (_dir, book) = open_book().await;
    let ex = three_questions(1);
    assert_ok!(book.add_exercise(&ex).await);
    let user = User::new("linus", "Linus", "T");

    let mut strong = Submission::new(user.clone(), ex.clone(), at(1_000), vec![10.0, 10.0, 9.0]);
    let mut weak = Submission::new(user.clone(), ex.clone(), at(2_000), vec![2.0, 0.0, 1.0]);
    let strong_id = assert_ok!(book.store_submission(&mut strong).await);
    let weak_id = assert_ok!(book.store_submission(&mut weak).await);

    let last = assert_ok!(book.get_last_submission(&user, &ex).await).unwrap();
    let best = assert_ok!(book.get_best_submission(&user, &ex).await).unwrap();

    assert_eq!(last.id, weak_id);
    assert_eq!(best.id, strong_id);
    assert_ne!(last.id, best.id);
    assert_eq!(best.total_grade(), 29.0);
}

#[tokio::test]
async fn best_submission_tie_goes_to_most_recent() {
    let (_dir, book) = open_book().await;
    let ex = three_questions(5);
    assert_ok!(book.add_exercise(&ex).await);
    let user = User::new("tie", "Tie", "Break");

    let mut older = Submission::new(user.clone(), ex.clone(), at(1_000), vec![5.0, 5.0, 5.0]);
    let mut newer = Submission::new(user.clone(), ex.clone(), at(3_000), vec![1.0, 4.0, 10.0]);
    let mut middle = Submission::new(user.clone(), ex.clone(), at(2_000), vec![0.0, 15.0, 0.0]);
    assert_ok!(book.store_submission(&mut older).await);
    let newer_id = assert_ok!(book.store_submission(&mut newer).await);
    assert_ok!(book.store_submission(&mut middle).await);

    let best = assert_ok!(book.get_best_submission(&user, &ex).await).unwrap();
    assert_eq!(best.id, newer_id);
}

#[tokio::test]
async fn grades_round_trip_in_order() {
    let (_dir, book) = open_book().await;
    let ex = three_questions(7);
    assert_ok!(book.add_exercise(&ex).await);
    let user = User::new("roundtrip", "Round", "Trip");

    let mut submission = Submission::new(user.clone(), ex.clone(), at(5_000), vec![7.5, 3.0, 10.0]);
    let id = assert_ok!(book.store_submission(&mut submission).await);
    assert_eq!(submission.id, id);
    assert!(submission.user.is_persisted());

    let fetched = assert_ok!(book.get_last_submission(&user, &ex).await).unwrap();
    assert_eq!(fetched.id, id);
    assert_eq!(fetched.question_grades, vec![7.5, 3.0, 10.0]);
    assert_eq!(fetched.submission_time, at(5_000));
    assert_eq!(fetched.user.id, submission.user.id);
    assert_eq!(fetched.exercise, ex);
}

#[tokio::test]
async fn restoring_with_existing_id_replaces_all_grades() {
    let (_dir, book) = open_book().await;
    let ex = three_questions(8);
    assert_ok!(book.add_exercise(&ex).await);
    let user = User::new("regrade", "Re", "Grade");

    let mut submission = Submission::new(user.clone(), ex.clone(), at(1_000), vec![1.0, 1.0, 1.0]);
    let id = assert_ok!(book.store_submission(&mut submission).await);

    submission.question_grades = vec![9.0, 8.0, 7.0];
    submission.submission_time = at(4_000);
    let again = assert_ok!(book.store_submission(&mut submission).await);

    assert_eq!(again, id);
    assert_eq!(assert_ok!(book.count_grades(id).await), 3);
    assert_eq!(count(&book, "SELECT COUNT(*) FROM Submission").await, 1);
    assert_eq!(count(&book, "SELECT COUNT(*) FROM QuestionGrade").await, 3);

    let fetched = assert_ok!(book.get_last_submission(&user, &ex).await).unwrap();
    assert_eq!(fetched.question_grades, vec![9.0, 8.0, 7.0]);
    assert_eq!(fetched.submission_time, at(4_000));
}

#[tokio::test]
async fn missing_submission_is_absent_not_an_error() {
    let (_dir, book) = open_book().await;
    let ex = three_questions(9);
    assert_ok!(book.add_exercise(&ex).await);
    let mut user = User::new("idle", "Idle", "User");
    assert_ok!(book.upsert_user(&mut user, "pw").await);

    assert!(assert_ok!(book.get_last_submission(&user, &ex).await).is_none());
    assert!(assert_ok!(book.get_best_submission(&user, &ex).await).is_none());

    let stranger = User::new("stranger", "Not", "Stored");
    assert!(assert_ok!(book.get_last_submission(&stranger, &ex).await).is_none());
}

#[tokio::test]
async fn storing_a_submission_provisions_the_user_without_a_password() {
    let (_dir, book) = open_book().await;
    let ex = three_questions(10);
    assert_ok!(book.add_exercise(&ex).await);
    let user = User::new("newcomer", "New", "Comer");

    let mut submission = Submission::new(user, ex, at(1_000), vec![1.0, 2.0, 3.0]);
    assert_ok!(book.store_submission(&mut submission).await);

    let stored = assert_ok!(book.find_user("newcomer").await).unwrap();
    assert_eq!(stored.id, submission.user.id);
    assert!(!assert_ok!(book.verify_login("newcomer", "").await));
}

#[tokio::test]
async fn storing_a_submission_keeps_an_existing_password() {
    let (_dir, book) = open_book().await;
    let ex = three_questions(11);
    assert_ok!(book.add_exercise(&ex).await);
    let mut user = User::new("keeper", "Keep", "Er");
    assert_ok!(book.upsert_user(&mut user, "secret").await);

    let mut submission = Submission::new(user.clone(), ex, at(1_000), vec![0.0, 0.0, 0.0]);
    assert_ok!(book.store_submission(&mut submission).await);

    assert_eq!(submission.user.id, user.id);
    assert!(assert_ok!(book.verify_login("keeper", "secret").await));
    assert_eq!(count(&book, "SELECT COUNT(*) FROM User").await, 1);
}

#[tokio::test]
async fn grade_count_mismatch_is_rejected_before_writing() {
    let (_dir, book) = open_book().await;
    let ex = three_questions(12);
    assert_ok!(book.add_exercise(&ex).await);

    let mut submission =
        Submission::new(User::new("short", "Short", "List"), ex, at(1_000), vec![1.0, 2.0]);
    let err = assert_err!(book.store_submission(&mut submission).await);

    assert!(matches!(err, AppError::Validation(_)));
    assert!(!submission.is_persisted());
    assert_eq!(count(&book, "SELECT COUNT(*) FROM Submission").await, 0);
    assert_eq!(count(&book, "SELECT COUNT(*) FROM User").await, 0);
}

#[tokio::test]
async fn operations_fail_after_close() {
    let (_dir, book) = open_book().await;
    book.close().await;
    assert!(book.is_closed());

    let err = assert_err!(book.load_exercises().await);
    assert!(matches!(err, AppError::StoreClosed));

    let mut user = User::new("late", "Too", "Late");
    let err = assert_err!(book.upsert_user(&mut user, "pw").await);
    assert!(matches!(err, AppError::StoreClosed));
}

#[tokio::test]
async fn reopening_keeps_data_and_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("persisted.db");
    let url = path.to_string_lossy().to_string();

    let book = assert_ok!(Gradebook::open(&url).await);
    assert_eq!(book.config().url, url);
    assert_ok!(book.add_exercise(&three_questions(1)).await);
    book.close().await;

    let reopened = assert_ok!(Gradebook::open(&format!("jdbc:sqlite:{}", url)).await);
    assert_eq!(assert_ok!(reopened.load_exercises().await), vec![three_questions(1)]);
}

#[tokio::test]
async fn long_usernames_and_names_are_stored_unchanged() {
    let (_dir, book) = open_book().await;
    let username = "y".repeat(300);
    let mut user = User::new(username.clone(), "Very", "Long");
    assert_ok!(book.upsert_user(&mut user, "p").await);
    assert!(assert_ok!(book.verify_login(&username, "p").await));

    let mut ex = Exercise::new(30, "n".repeat(300), at(1_767_225_600_000));
    ex.add_question("q".repeat(300), "d".repeat(70_000), 4);
    assert!(assert_ok!(book.add_exercise(&ex).await).is_added());
    assert_eq!(assert_ok!(book.load_exercises().await), vec![ex.clone()]);

    let mut submission = Submission::new(user, ex, at(1_000), vec![4.0]);
    assert_ok!(book.store_submission(&mut submission).await);
}

#[tokio::test]
async fn empty_username_is_rejected() {
    let (_dir, book) = open_book().await;
    let mut user = User::new("", "No", "Name");

    let err = assert_err!(book.upsert_user(&mut user, "pw").await);
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(count(&book, "SELECT COUNT(*) FROM User").await, 0);
}

#[tokio::test]
async fn failed_question_insert_rolls_back_exercise_registration() {
    let (_dir, book) = open_book().await;
    // A stray question row occupying the key of question 2 of exercise 5
    sqlx::query(r#"INSERT INTO Question (ExerciseId, QuestionId, Name, "Desc", Points) VALUES (5, 2, 'stray', 'left over', 1)"#)
        .execute(book.db())
        .await
        .unwrap();

    let err = assert_err!(book.add_exercise(&three_questions(5)).await);

    assert!(matches!(err, AppError::Database(_)));
    assert!(!err.is_caller_error());
    assert_eq!(count(&book, "SELECT COUNT(*) FROM Exercise").await, 0);
    assert_eq!(count(&book, "SELECT COUNT(*) FROM Question").await, 1);
    assert!(assert_ok!(book.load_exercises().await).is_empty());
}

#[tokio::test]
async fn failed_grade_insert_rolls_back_submission_storage() {
    let (_dir, book) = open_book().await;
    let ex = three_questions(6);
    assert_ok!(book.add_exercise(&ex).await);
    sqlx::query(
        "CREATE TRIGGER reject_grades BEFORE INSERT ON QuestionGrade BEGIN SELECT RAISE(ABORT, 'grades rejected'); END",
    )
    .execute(book.db())
    .await
    .unwrap();

    let mut submission =
        Submission::new(User::new("unlucky", "Un", "Lucky"), ex, at(1_000), vec![1.0, 2.0, 3.0]);
    let err = assert_err!(book.store_submission(&mut submission).await);

    assert!(matches!(err, AppError::Database(_)));
    assert!(!submission.is_persisted());
    assert!(!submission.user.is_persisted());
    assert_eq!(count(&book, "SELECT COUNT(*) FROM User").await, 0);
    assert_eq!(count(&book, "SELECT COUNT(*) FROM Submission").await, 0);
    assert_eq!(count(&book, "SELECT COUNT(*) FROM QuestionGrade").await, 0);
}
