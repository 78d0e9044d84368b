/*!
 * Database entity models.
 *
 * These structures map directly to database tables. Quiz and flashcard
 * payloads are stored as JSON text and decoded into the content types on
 * read.
 */

use serde::{Deserialize, Serialize};

use crate::content::{FlashcardItem, QuizQuestion};

/// Title prefix for courses created from a single generated video
pub const GENERATED_COURSE_PREFIX: &str = "AI Generated: ";

/// Course record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Source playlist, if the course was imported from one
    pub playlist_id: Option<String>,
    pub thumbnail_url: Option<String>,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
}

impl CourseRecord {
    /// Title of the course holding generated content for a video
    pub fn generated_title(video_title: &str) -> String {
        format!("{}{}", GENERATED_COURSE_PREFIX, video_title)
    }

    /// Description of the course holding generated content for a video
    pub fn generated_description(video_id: &str) -> String {
        format!("AI-generated content for YouTube video ID: {}", video_id)
    }
}

/// Video record, ordered within its course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: i64,
    pub course_id: i64,
    /// 1-based position inside the course
    pub order_index: i64,
    pub title: String,
    pub youtube_id: String,
    pub duration_seconds: i64,
}

/// Stored quiz for a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub id: i64,
    pub video_id: i64,
    pub questions: Vec<QuizQuestion>,
}

/// Stored flashcard set for a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardRecord {
    pub id: i64,
    pub video_id: i64,
    pub cards: Vec<FlashcardItem>,
}

/// A learner's progress against one video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub id: i64,
    pub user_id: i64,
    pub video_id: i64,
    /// Percentage score of the last quiz attempt (0-100)
    pub quiz_score: Option<u8>,
    /// Stays true once the video has been completed
    pub is_completed: bool,
    pub started_at: String,
    /// Set the first time the video is completed and never moved afterwards
    pub completed_at: Option<String>,
}

/// Progress values submitted for a video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSubmission {
    pub quiz_score: u8,
    pub is_completed: bool,
}

/// A video with its generated content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDetail {
    #[serde(flatten)]
    pub video: VideoRecord,
    /// Quiz questions, empty when no quiz is stored
    pub quiz: Vec<QuizQuestion>,
    pub flashcards: Vec<FlashcardItem>,
}

/// A course with all of its videos
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: CourseRecord,
    pub videos: Vec<VideoDetail>,
}
