/*!
 * Quiz grading and the Mastery Gate.
 *
 * A learner's answers are graded against the stored quiz into a 0-100
 * percentage. The video counts as completed when the score reaches the
 * configured mastery threshold.
 */

use thiserror::Error;

use crate::content::QuizQuestion;
use crate::database::ProgressSubmission;

/// Errors raised while grading answers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GradingError {
    #[error("Quiz has no questions")]
    EmptyQuiz,

    #[error("Expected {expected} answer(s), got {found}")]
    AnswerCountMismatch { expected: usize, found: usize },

    #[error("Answer {position} selects option {answer}, but the question has {options} options")]
    AnswerOutOfRange {
        position: usize,
        answer: u32,
        options: usize,
    },

    #[error("Invalid answer '{0}': expected a 0-based option index")]
    InvalidAnswer(String),
}

/// Result of grading one quiz attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizGrade {
    pub correct: usize,
    pub total: usize,
    /// Rounded percentage in [0, 100]
    pub score: u8,
}

/// Completion rule applied to graded attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasteryGate {
    threshold: u8,
}

impl MasteryGate {
    /// Gate passing at `threshold` percent; values above 100 are clamped
    pub fn new(threshold: u8) -> Self {
        Self {
            threshold: threshold.min(100),
        }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn passes(&self, score: u8) -> bool {
        score >= self.threshold
    }

    /// Grade `answers` and turn the grade into a progress submission
    pub fn evaluate(
        &self,
        questions: &[QuizQuestion],
        answers: &[u32],
    ) -> Result<(QuizGrade, ProgressSubmission), GradingError> {
        let grade = grade_answers(questions, answers)?;
        let submission = ProgressSubmission {
            quiz_score: grade.score,
            is_completed: self.passes(grade.score),
        };
        Ok((grade, submission))
    }
}

impl Default for MasteryGate {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Grade one answer per question
pub fn grade_answers(
    questions: &[QuizQuestion],
    answers: &[u32],
) -> Result<QuizGrade, GradingError> {
    if questions.is_empty() {
        return Err(GradingError::EmptyQuiz);
    }
    if questions.len() != answers.len() {
        return Err(GradingError::AnswerCountMismatch {
            expected: questions.len(),
            found: answers.len(),
        });
    }

    let mut correct = 0;
    for (position, (question, &answer)) in questions.iter().zip(answers).enumerate() {
        if answer as usize >= question.options.len() {
            return Err(GradingError::AnswerOutOfRange {
                position,
                answer,
                options: question.options.len(),
            });
        }
        if answer == question.correct {
            correct += 1;
        }
    }

    let total = questions.len();
    let score = ((correct * 100) as f64 / total as f64).round() as u8;

    Ok(QuizGrade {
        correct,
        total,
        score,
    })
}

/// Parse a comma separated answer list such as `0,2,1`
pub fn parse_answers(input: &str) -> Result<Vec<u32>, GradingError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u32>()
                .map_err(|_| GradingError::InvalidAnswer(part.to_string()))
        })
        .collect()
}
