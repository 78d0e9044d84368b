/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use quizforge::app_config::Config;
use quizforge::app_controller::Controller;
use quizforge::content::ContentKind;
use quizforge::providers::mock::{MockErrorKind, MockProvider, MockReply};
use crate::common::{self, VIDEO_ID};

/// Test the controller initialization with a file database
#[test]
fn test_controller_fromConfig_withDatabasePath_shouldSucceed() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let mut config = Config::default();
    config.database_path = Some(dir.path().join("data").join("quizforge.db"));

    let controller = Controller::from_config(config)?;

    assert!(dir.path().join("data").join("quizforge.db").exists());
    assert_eq!(controller.config().progress.mastery_threshold, 100);
    Ok(())
}

#[test]
fn test_controller_fromConfig_withInvalidLanguage_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let mut config = Config::default();
    config.database_path = Some(dir.path().join("quizforge.db"));
    config.transcript.languages = vec!["klingon".to_string()];

    assert!(Controller::from_config(config).is_err());
    Ok(())
}

/// Generate, inspect and pass the Mastery Gate for one video
#[test]
fn test_lifecycle_generateThenSubmitAnswers_shouldCompleteVideo() -> Result<()> {
    let controller = common::controller(MockProvider::working())?;

    let result = tokio_test::block_on(async {
        let outcome = controller.generate(VIDEO_ID, true).await?;
        let course = outcome.course.expect("content should be stored");
        let detail = controller.course_detail(course.id).await?;
        let video_id = detail.videos[0].video.id;

        let failed = controller.submit_answers(9, video_id, &[1, 0, 0]).await?;
        let passed = controller.submit_answers(9, video_id, &[1, 0, 2]).await?;
        let progress = controller.list_progress(9).await?;
        anyhow::Ok((failed, passed, progress))
    });

    let (failed, passed, progress) = result?;
    assert!(!failed.progress.is_completed);
    assert_eq!(failed.progress.quiz_score, Some(67));
    assert!(passed.progress.is_completed);
    assert!(passed.progress.completed_at.is_some());
    assert_eq!(progress.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_generate_whenQuizFails_shouldStoreNothing() -> Result<()> {
    let provider = MockProvider::working()
        .with_kind_reply(ContentKind::Quiz, MockReply::Error(MockErrorKind::Connection));
    let controller = common::controller(provider)?;

    let result = controller.generate(VIDEO_ID, true).await;

    assert!(result.is_err());
    assert!(controller.list_courses().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_courseDetail_withUnknownCourse_shouldFail() -> Result<()> {
    let controller = common::controller(MockProvider::working())?;

    let error = controller.course_detail(404).await.unwrap_err();

    assert!(error.to_string().contains("Course not found: 404"));
    Ok(())
}

#[tokio::test]
async fn test_generate_outcome_shouldSerializeForCli() -> Result<()> {
    let controller = common::controller(MockProvider::working())?;

    let outcome = controller.generate(VIDEO_ID, false).await?;
    let value = serde_json::to_value(&outcome)?;

    assert_eq!(value["video_id"], VIDEO_ID);
    assert_eq!(value["quiz"]["quiz"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["flashcards"]["flashcards"].as_array().map(Vec::len), Some(5));
    assert!(value["course"].is_null());
    Ok(())
}
