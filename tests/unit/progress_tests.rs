/*!
 * Tests for quiz grading and the Mastery Gate
 */

use quizforge::progress::{grade_answers, parse_answers, GradingError, MasteryGate};
use crate::common::fixtures;

#[test]
fn test_gradeAnswers_allWrong_shouldScoreZero() {
    let quiz = fixtures::valid_quiz();

    let grade = grade_answers(&quiz.quiz, &[3, 3, 3]).unwrap();

    assert_eq!(grade.correct, 0);
    assert_eq!(grade.score, 0);
}

#[test]
fn test_gradeAnswers_oneCorrect_shouldRoundDown() {
    let quiz = fixtures::valid_quiz();

    let grade = grade_answers(&quiz.quiz, &[1, 3, 3]).unwrap();

    assert_eq!(grade.score, 33);
}

#[test]
fn test_gradeAnswers_emptyQuiz_shouldFail() {
    assert_eq!(grade_answers(&[], &[]), Err(GradingError::EmptyQuiz));
}

#[test]
fn test_masteryGate_threshold_shouldBeClamped() {
    assert_eq!(MasteryGate::new(250).threshold(), 100);
    assert!(MasteryGate::new(0).passes(0));
    assert!(!MasteryGate::default().passes(99));
}

#[test]
fn test_parseAnswers_withTrailingComma_shouldIgnoreEmptyPart() {
    assert_eq!(parse_answers("1,0,2,").unwrap(), vec![1, 0, 2]);
    assert!(parse_answers("-1,0,2").is_err());
}
