/*!
 * Model output fixtures, valid and broken
 */

use serde_json::{json, Value};

use quizforge::content::{GeneratedFlashcards, GeneratedQuiz};
use quizforge::providers::mock::MockProvider;

pub fn valid_quiz_json() -> String {
    MockProvider::sample_quiz_json()
}

pub fn valid_flashcards_json() -> String {
    MockProvider::sample_flashcards_json()
}

pub fn valid_quiz() -> GeneratedQuiz {
    serde_json::from_str(&valid_quiz_json()).expect("fixture quiz should parse")
}

pub fn valid_flashcards() -> GeneratedFlashcards {
    serde_json::from_str(&valid_flashcards_json()).expect("fixture flashcards should parse")
}

/// The valid quiz with another video title
pub fn quiz_titled(title: &str) -> GeneratedQuiz {
    let mut quiz = valid_quiz();
    quiz.video_title = title.to_string();
    quiz
}

fn quiz_value() -> Value {
    serde_json::from_str(&valid_quiz_json()).expect("fixture quiz should parse")
}

/// Quiz whose second question lacks `correct`
pub fn quiz_missing_correct_json() -> String {
    let mut value = quiz_value();
    if let Some(question) = value["quiz"][1].as_object_mut() {
        question.remove("correct");
    }
    value.to_string()
}

/// Quiz whose first question has only three options
pub fn quiz_three_options_json() -> String {
    let mut value = quiz_value();
    value["quiz"][0]["options"] = json!(["A loop", "A function that calls itself", "A variable"]);
    value.to_string()
}

/// Quiz answer wrapped the way chat models often reply
pub fn fenced(json_text: &str) -> String {
    format!("Here is the quiz you asked for:\n```json\n{}\n```\nGood luck!", json_text)
}
