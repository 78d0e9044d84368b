/*!
 * Tests for content schemas and prompt building
 */

use quizforge::content::{
    build_prompt, json_schema, ContentKind, ContentSchema, GeneratedFlashcards, GeneratedQuiz,
    PromptTemplate, StructuredContent,
};
use crate::common::fixtures;

#[test]
fn test_buildPrompt_withTranscript_shouldEmbedContentAndSchema() {
    let descriptor = GeneratedQuiz::descriptor();

    let payload = build_prompt("Intro to recursion. A function calls itself.", &descriptor);
    let messages: Vec<&str> = payload.user_messages().collect();

    assert_eq!(payload.kind, ContentKind::Quiz);
    assert_eq!(payload.system, PromptTemplate::QUIZ_GENERATOR);
    assert_eq!(messages[0], "Video Content: Intro to recursion. A function calls itself.");
    assert!(messages[1].starts_with("Output Format: "));

    let schema_text = serde_json::to_string(&json_schema(&descriptor)).unwrap();
    assert!(messages[1].contains(&schema_text));
}

#[test]
fn test_promptTemplates_shouldDemandStrictJsonAndExactCounts() {
    assert!(PromptTemplate::QUIZ_GENERATOR.contains("exactly **3 difficult"));
    assert!(PromptTemplate::QUIZ_GENERATOR.contains("Mastery Gate"));
    assert!(PromptTemplate::FLASHCARD_GENERATOR.contains("exactly **5 key concept flashcards"));
    assert_eq!(
        PromptTemplate::for_kind(ContentKind::Flashcards).render(),
        PromptTemplate::FLASHCARD_GENERATOR
    );
}

#[test]
fn test_buildPrompt_withPlaceholderContent_shouldStillProducePrompt() {
    let placeholder = "Transcript not available. Use the video ID and topic to generate the quiz. Error: boom";

    let payload = build_prompt(placeholder, &GeneratedFlashcards::descriptor());

    assert_eq!(payload.messages.len(), 2);
    assert_eq!(payload.messages[0].content, format!("Video Content: {}", placeholder));
}

#[test]
fn test_quizSerialize_shouldEmitCanonicalExplanationKey() {
    let raw = fixtures::valid_quiz_json().replace("explanation", "explaination");
    let quiz: GeneratedQuiz = serde_json::from_str(&raw).unwrap();

    let emitted = serde_json::to_string(&quiz).unwrap();

    assert!(emitted.contains("\"explanation\""));
    assert!(!emitted.contains("explaination"));
}

#[test]
fn test_structuredContent_serialize_shouldMatchInnerShape() {
    let quiz = fixtures::valid_quiz();
    let content = StructuredContent::from(quiz.clone());

    assert_eq!(
        serde_json::to_value(&content).unwrap(),
        serde_json::to_value(&quiz).unwrap()
    );
    assert_eq!(content.kind(), ContentKind::Quiz);
    assert_eq!(content.video_title(), "Intro to Recursion");
}

#[test]
fn test_fixtures_shouldSatisfyTheirSchemas() {
    assert!(fixtures::valid_quiz().validate().is_ok());
    assert!(fixtures::valid_flashcards().validate().is_ok());
}
