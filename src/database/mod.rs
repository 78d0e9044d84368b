/*!
 * Database module for persistent storage of courses and learner progress.
 *
 * This module provides SQLite-based persistence for:
 * - Courses and their ordered videos
 * - Generated quizzes and flashcard sets per video
 * - Per-user progress through the Mastery Gate
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

pub use connection::{DatabaseConnection, DatabaseStats};
pub use models::{
    CourseDetail, CourseRecord, FlashcardRecord, ProgressRecord, ProgressSubmission, QuizRecord,
    VideoDetail, VideoRecord,
};
pub use repository::Repository;
