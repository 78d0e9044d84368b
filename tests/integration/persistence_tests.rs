/*!
 * Integration tests for SQLite storage of generated content and progress
 */

use anyhow::Result;
use quizforge::database::{DatabaseConnection, ProgressSubmission, Repository};
use crate::common::{self, fixtures, VIDEO_ID};

fn count_rows(repo: &Repository, table: &'static str) -> i64 {
    repo.connection()
        .execute(move |conn| {
            let sql = format!("SELECT COUNT(*) FROM {}", table);
            Ok(conn.query_row(&sql, [], |row| row.get(0))?)
        })
        .unwrap()
}

#[tokio::test]
async fn test_save_sameTitleTwice_shouldReplaceVideosQuizzesAndFlashcards() -> Result<()> {
    let repo = Repository::new_in_memory()?;
    let flashcards = fixtures::valid_flashcards();

    let first = repo.save_generated_content(&fixtures::valid_quiz(), &flashcards, VIDEO_ID).await?;

    let mut revised = fixtures::valid_quiz();
    revised.quiz[0].question = "What does a recursive function do?".to_string();
    let second = repo.save_generated_content(&revised, &flashcards, VIDEO_ID).await?;

    assert_eq!(first.id, second.id);
    assert_eq!(count_rows(&repo, "courses"), 1);
    assert_eq!(count_rows(&repo, "videos"), 1);
    assert_eq!(count_rows(&repo, "quizzes"), 1);
    assert_eq!(count_rows(&repo, "flashcards"), 1);

    let detail = repo.get_course_detail(second.id).await?.expect("course should exist");
    assert_eq!(detail.videos[0].quiz[0].question, "What does a recursive function do?");
    Ok(())
}

#[tokio::test]
async fn test_save_differentTitles_shouldCreateSeparateCourses() -> Result<()> {
    let repo = Repository::new_in_memory()?;
    let flashcards = fixtures::valid_flashcards();

    repo.save_generated_content(&fixtures::quiz_titled("Recursion"), &flashcards, "vid1").await?;
    repo.save_generated_content(&fixtures::quiz_titled("Iteration"), &flashcards, "vid2").await?;

    let titles: Vec<String> = repo.list_courses().await?.into_iter().map(|c| c.title).collect();
    assert_eq!(titles, vec!["AI Generated: Recursion", "AI Generated: Iteration"]);
    Ok(())
}

#[tokio::test]
async fn test_save_whenAWriteFails_shouldLeaveNoRows() -> Result<()> {
    let repo = Repository::new_in_memory()?;
    repo.connection().execute(|conn| {
        conn.execute_batch("DROP TABLE flashcards;")?;
        Ok(())
    })?;

    let result = repo
        .save_generated_content(&fixtures::valid_quiz(), &fixtures::valid_flashcards(), VIDEO_ID)
        .await;

    assert!(result.is_err());
    assert_eq!(count_rows(&repo, "courses"), 0);
    assert_eq!(count_rows(&repo, "videos"), 0);
    assert_eq!(count_rows(&repo, "quizzes"), 0);
    Ok(())
}

#[tokio::test]
async fn test_save_toFile_shouldSurviveReopen() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("quizforge.db");

    let course = {
        let repo = Repository::new(DatabaseConnection::new(&path)?);
        repo.save_generated_content(
            &fixtures::valid_quiz(),
            &fixtures::valid_flashcards(),
            VIDEO_ID,
        )
        .await?
    };

    let reopened = Repository::new(DatabaseConnection::new(&path)?);
    let detail = reopened.get_course_detail(course.id).await?.expect("course should persist");

    assert_eq!(detail.course, course);
    assert_eq!(detail.videos[0].flashcards, fixtures::valid_flashcards().flashcards);
    Ok(())
}

#[tokio::test]
async fn test_submitProgress_resubmission_shouldUpdateScoreAndKeepFirstCompletion() -> Result<()> {
    let repo = Repository::new_in_memory()?;

    let attempt = repo
        .submit_progress(1, 3, ProgressSubmission { quiz_score: 33, is_completed: false })
        .await?;
    assert!(attempt.completed_at.is_none());

    let passed = repo
        .submit_progress(1, 3, ProgressSubmission { quiz_score: 100, is_completed: true })
        .await?;
    assert_eq!(passed.id, attempt.id);
    assert_eq!(passed.quiz_score, Some(100));
    let completed_at = passed.completed_at.clone().expect("completion should be stamped");

    let retaken = repo
        .submit_progress(1, 3, ProgressSubmission { quiz_score: 67, is_completed: true })
        .await?;
    assert_eq!(retaken.quiz_score, Some(67));
    assert_eq!(retaken.completed_at.as_deref(), Some(completed_at.as_str()));

    assert_eq!(repo.list_progress(1).await?.len(), 1);
    Ok(())
}
