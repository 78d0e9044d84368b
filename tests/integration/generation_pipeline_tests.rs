/*!
 * Integration tests for the transcript -> prompt -> model -> validated content pipeline
 */

use quizforge::content::schema::{FLASHCARD_COUNT, QUIZ_OPTION_COUNT, QUIZ_QUESTION_COUNT};
use quizforge::content::{ContentKind, StructuredContent};
use quizforge::errors::{GenerationError, ProviderError};
use quizforge::providers::mock::{MockErrorKind, MockProvider, MockReply};
use quizforge::transcript::{StaticTranscriptSource, PLACEHOLDER_PREFIX};
use crate::common::{self, fixtures, VIDEO_ID};

#[tokio::test]
async fn test_generateAll_withCaptions_shouldReturnValidQuizAndFlashcards() {
    let generator = common::generator(MockProvider::working());

    let (quiz, flashcards) = generator.generate_all_content(VIDEO_ID).await.unwrap();

    assert_eq!(quiz.quiz.len(), QUIZ_QUESTION_COUNT);
    for question in &quiz.quiz {
        assert_eq!(question.options.len(), QUIZ_OPTION_COUNT);
        assert!((question.correct as usize) < QUIZ_OPTION_COUNT);
    }
    assert_eq!(flashcards.flashcards.len(), FLASHCARD_COUNT);
}

#[tokio::test]
async fn test_generate_abc123Scenario_shouldSendJoinedCaptionsAndReturnQuizUnmodified() {
    let provider = MockProvider::working();
    let generator = common::generator(provider.clone());

    let content = generator.generate(VIDEO_ID, ContentKind::Quiz).await.unwrap();

    assert_eq!(content, StructuredContent::Quiz(fixtures::valid_quiz()));
    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].messages[0].content,
        "Video Content: Intro to recursion. A function calls itself."
    );
}

#[tokio::test]
async fn test_generateAll_withoutTranscript_shouldUsePlaceholderAndComplete() {
    let provider = MockProvider::working();
    let source = StaticTranscriptSource::new().with_unknown_video(VIDEO_ID);
    let generator = common::generator_with(provider.clone(), source);

    let result = generator.generate_all(VIDEO_ID).await;

    assert!(result.is_ok());
    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        let content = &request.messages[0].content;
        assert!(content.starts_with(&format!("Video Content: {} Error: ", PLACEHOLDER_PREFIX)));
    }
}

#[tokio::test]
async fn test_generateAll_sameInputAndModelOutput_shouldBeByteIdentical() {
    let first = common::generator(MockProvider::working())
        .generate_all(VIDEO_ID)
        .await
        .unwrap();
    let second = common::generator(MockProvider::working())
        .generate_all(VIDEO_ID)
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_string(&first.quiz).unwrap(),
        serde_json::to_string(&second.quiz).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&first.flashcards).unwrap(),
        serde_json::to_string(&second.flashcards).unwrap()
    );
}

#[tokio::test]
async fn test_generate_withMissingCorrect_shouldFailSchemaValidation() {
    let provider = MockProvider::working()
        .with_kind_reply(ContentKind::Quiz, MockReply::text(fixtures::quiz_missing_correct_json()));
    let generator = common::generator(provider.clone());

    let error = generator.generate(VIDEO_ID, ContentKind::Quiz).await.unwrap_err();

    assert!(matches!(
        error,
        GenerationError::SchemaValidationFailure { kind: ContentKind::Quiz, .. }
    ));
    // One repair attempt, then give up
    assert_eq!(provider.request_count(), 2);
}

#[tokio::test]
async fn test_generate_withThreeOptions_shouldFailSchemaValidation() {
    let provider = MockProvider::working()
        .with_kind_reply(ContentKind::Quiz, MockReply::text(fixtures::quiz_three_options_json()));
    let generator = common::generator(provider);

    let error = generator.generate(VIDEO_ID, ContentKind::Quiz).await.unwrap_err();

    match error {
        GenerationError::SchemaValidationFailure { reason, .. } => {
            assert!(reason.contains("quiz[0].options"), "unexpected reason: {}", reason);
        }
        other => panic!("expected schema failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_generate_withInvalidThenValidOutput_shouldRepairViaFeedback() {
    let provider = MockProvider::working().with_script(vec![
        MockReply::text(fixtures::quiz_three_options_json()),
        MockReply::text(fixtures::valid_quiz_json()),
    ]);
    let generator = common::generator(provider.clone());

    let content = generator.generate(VIDEO_ID, ContentKind::Quiz).await.unwrap();

    assert_eq!(content, StructuredContent::Quiz(fixtures::valid_quiz()));
    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].messages.len(), requests[0].messages.len() + 1);
}

#[tokio::test]
async fn test_generate_withFencedOutput_shouldExtractJson() {
    let provider = MockProvider::working().with_kind_reply(
        ContentKind::Quiz,
        MockReply::text(fixtures::fenced(&fixtures::valid_quiz_json())),
    );
    let generator = common::generator(provider);

    let content = generator.generate(VIDEO_ID, ContentKind::Quiz).await.unwrap();

    assert_eq!(content.into_quiz(), Some(fixtures::valid_quiz()));
}

#[tokio::test]
async fn test_generateAll_whenFlashcardsFail_shouldReturnAggregateFailureOnly() {
    let provider = MockProvider::working()
        .with_kind_reply(ContentKind::Flashcards, MockReply::Error(MockErrorKind::Auth));
    let generator = common::generator(provider);

    let failure = generator.generate_all_content(VIDEO_ID).await.unwrap_err();

    assert_eq!(failure.kind, ContentKind::Flashcards);
    assert_eq!(failure.video_id, VIDEO_ID);
    assert!(matches!(
        failure.source,
        GenerationError::ModelInvocationFailure {
            attempts: 1,
            source: ProviderError::AuthenticationError(_),
        }
    ));
}

#[tokio::test]
async fn test_generate_withTransientServerErrors_shouldRetryThenSucceed() {
    let provider = MockProvider::working().with_script(vec![
        MockReply::Error(MockErrorKind::Server),
        MockReply::Error(MockErrorKind::RateLimit),
    ]);
    let generator = common::generator(provider.clone());

    let result = generator.generate(VIDEO_ID, ContentKind::Flashcards).await;

    assert!(result.is_ok());
    assert_eq!(provider.request_count(), 3);
}

#[tokio::test]
async fn test_generateAll_shouldFetchTranscriptOnce() {
    let source = common::caption_source();
    let generator = common::generator_with(MockProvider::working(), source.clone());

    generator.generate_all(VIDEO_ID).await.unwrap();

    assert_eq!(source.fetch_count(), 1);
}
