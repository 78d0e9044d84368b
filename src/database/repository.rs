/*!
 * Repository layer for database operations.
 *
 * This module provides a high-level API over the course catalogue and
 * progress tables, abstracting away the SQL details.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension};

use super::connection::DatabaseConnection;
use super::models::{
    CourseDetail, CourseRecord, FlashcardRecord, ProgressRecord, ProgressSubmission, QuizRecord,
    VideoDetail, VideoRecord,
};
use crate::content::{FlashcardItem, GeneratedFlashcards, GeneratedQuiz, QuizQuestion};

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// The underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    // =========================================================================
    // Generated Content
    // =========================================================================

    /// Persist a generated quiz and flashcard set as a single-video course.
    ///
    /// The course is keyed by its title. Saving content for a title that
    /// already exists reuses the course row and replaces its videos, quizzes
    /// and flashcards. Everything is written in one transaction; on error
    /// nothing is kept.
    pub async fn save_generated_content(
        &self,
        quiz: &GeneratedQuiz,
        flashcards: &GeneratedFlashcards,
        video_id: &str,
    ) -> Result<CourseRecord> {
        let title = CourseRecord::generated_title(&quiz.video_title);
        let description = CourseRecord::generated_description(video_id);
        let video_title = quiz.video_title.clone();
        let youtube_id = video_id.to_string();
        let question_data =
            serde_json::to_string(&quiz.quiz).context("Failed to encode quiz questions")?;
        let flashcard_data = serde_json::to_string(&flashcards.flashcards)
            .context("Failed to encode flashcards")?;

        let course = self
            .db
            .transaction_async(move |tx| {
                let existing = Self::find_course_by_title_sync(tx, &title)?;

                let course = match existing {
                    Some(course) => {
                        debug!("Replacing content of existing course {} ({})", course.id, title);
                        Self::clear_course_content_sync(tx, course.id)?;
                        course
                    }
                    None => {
                        let created_at = chrono::Utc::now().to_rfc3339();
                        tx.execute(
                            r#"
                            INSERT INTO courses (title, description, playlist_id, thumbnail_url, created_at)
                            VALUES (?1, ?2, NULL, NULL, ?3)
                            "#,
                            params![title, description, created_at],
                        )?;
                        CourseRecord {
                            id: tx.last_insert_rowid(),
                            title,
                            description,
                            playlist_id: None,
                            thumbnail_url: None,
                            created_at,
                        }
                    }
                };

                tx.execute(
                    r#"
                    INSERT INTO videos (course_id, order_index, title, youtube_id, duration_seconds)
                    VALUES (?1, 1, ?2, ?3, 0)
                    "#,
                    params![course.id, video_title, youtube_id],
                )?;
                let video_row_id = tx.last_insert_rowid();

                tx.execute(
                    "INSERT INTO quizzes (video_id, question_data) VALUES (?1, ?2)",
                    params![video_row_id, question_data],
                )?;
                tx.execute(
                    "INSERT INTO flashcards (video_id, flashcard_data) VALUES (?1, ?2)",
                    params![video_row_id, flashcard_data],
                )?;

                Ok(course)
            })
            .await
            .context("Failed to save generated content")?;

        info!("Saved generated content for {} as course {}", video_id, course.id);
        Ok(course)
    }

    fn find_course_by_title_sync(conn: &Connection, title: &str) -> Result<Option<CourseRecord>> {
        let result = conn
            .query_row(
                r#"
                SELECT id, title, description, playlist_id, thumbnail_url, created_at
                FROM courses WHERE title = ?1
                ORDER BY id LIMIT 1
                "#,
                [title],
                parse_course_row,
            )
            .optional()?;
        Ok(result)
    }

    fn clear_course_content_sync(conn: &Connection, course_id: i64) -> Result<()> {
        conn.execute(
            "DELETE FROM quizzes WHERE video_id IN (SELECT id FROM videos WHERE course_id = ?1)",
            [course_id],
        )?;
        conn.execute(
            "DELETE FROM flashcards WHERE video_id IN (SELECT id FROM videos WHERE course_id = ?1)",
            [course_id],
        )?;
        conn.execute("DELETE FROM videos WHERE course_id = ?1", [course_id])?;
        Ok(())
    }

    // =========================================================================
    // Courses
    // =========================================================================

    /// Get a course by ID
    pub async fn get_course(&self, course_id: i64) -> Result<Option<CourseRecord>> {
        self.db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        r#"
                        SELECT id, title, description, playlist_id, thumbnail_url, created_at
                        FROM courses WHERE id = ?1
                        "#,
                        [course_id],
                        parse_course_row,
                    )
                    .optional()?;
                Ok(result)
            })
            .await
    }

    /// List all courses, oldest first
    pub async fn list_courses(&self) -> Result<Vec<CourseRecord>> {
        self.db
            .execute_async(|conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, title, description, playlist_id, thumbnail_url, created_at
                    FROM courses ORDER BY id
                    "#,
                )?;
                let courses = stmt
                    .query_map([], parse_course_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(courses)
            })
            .await
    }

    /// Get a course with its videos, quizzes and flashcards
    pub async fn get_course_detail(&self, course_id: i64) -> Result<Option<CourseDetail>> {
        let Some(course) = self.get_course(course_id).await? else {
            return Ok(None);
        };

        let videos = self
            .db
            .execute_async(move |conn| {
                let videos = Self::list_videos_sync(conn, course_id)?;
                let mut details = Vec::with_capacity(videos.len());
                for video in videos {
                    let quiz = Self::get_quiz_sync(conn, video.id)?
                        .map(|record| record.questions)
                        .unwrap_or_default();
                    let flashcards = Self::get_flashcards_sync(conn, video.id)?
                        .map(|record| record.cards)
                        .unwrap_or_default();
                    details.push(VideoDetail {
                        video,
                        quiz,
                        flashcards,
                    });
                }
                Ok(details)
            })
            .await?;

        Ok(Some(CourseDetail { course, videos }))
    }

    // =========================================================================
    // Videos and content
    // =========================================================================

    /// Get a video by ID
    pub async fn get_video(&self, video_id: i64) -> Result<Option<VideoRecord>> {
        self.db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        r#"
                        SELECT id, course_id, order_index, title, youtube_id, duration_seconds
                        FROM videos WHERE id = ?1
                        "#,
                        [video_id],
                        parse_video_row,
                    )
                    .optional()?;
                Ok(result)
            })
            .await
    }

    /// List the videos of a course in order
    pub async fn list_videos(&self, course_id: i64) -> Result<Vec<VideoRecord>> {
        self.db
            .execute_async(move |conn| Self::list_videos_sync(conn, course_id))
            .await
    }

    fn list_videos_sync(conn: &Connection, course_id: i64) -> Result<Vec<VideoRecord>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT id, course_id, order_index, title, youtube_id, duration_seconds
            FROM videos WHERE course_id = ?1
            ORDER BY order_index, id
            "#,
        )?;
        let videos = stmt
            .query_map([course_id], parse_video_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(videos)
    }

    /// Get the quiz stored for a video
    pub async fn get_quiz_for_video(&self, video_id: i64) -> Result<Option<QuizRecord>> {
        self.db
            .execute_async(move |conn| Self::get_quiz_sync(conn, video_id))
            .await
    }

    fn get_quiz_sync(conn: &Connection, video_id: i64) -> Result<Option<QuizRecord>> {
        let row: Option<(i64, String)> = conn
            .query_row(
                "SELECT id, question_data FROM quizzes WHERE video_id = ?1 ORDER BY id LIMIT 1",
                [video_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        row.map(|(id, data)| {
            let questions: Vec<QuizQuestion> = serde_json::from_str(&data)
                .with_context(|| format!("Corrupt quiz data for video {}", video_id))?;
            Ok(QuizRecord {
                id,
                video_id,
                questions,
            })
        })
        .transpose()
    }

    /// Get the flashcard set stored for a video
    pub async fn get_flashcards_for_video(&self, video_id: i64) -> Result<Option<FlashcardRecord>> {
        self.db
            .execute_async(move |conn| Self::get_flashcards_sync(conn, video_id))
            .await
    }

    fn get_flashcards_sync(conn: &Connection, video_id: i64) -> Result<Option<FlashcardRecord>> {
        let row: Option<(i64, String)> = conn
            .query_row(
                "SELECT id, flashcard_data FROM flashcards WHERE video_id = ?1 ORDER BY id LIMIT 1",
                [video_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        row.map(|(id, data)| {
            let cards: Vec<FlashcardItem> = serde_json::from_str(&data)
                .with_context(|| format!("Corrupt flashcard data for video {}", video_id))?;
            Ok(FlashcardRecord { id, video_id, cards })
        })
        .transpose()
    }

    // =========================================================================
    // Progress
    // =========================================================================

    /// Record a progress submission for a user and video.
    ///
    /// Creates the record on first submission and updates the score
    /// afterwards. Completion is sticky: once a video is complete, a lower
    /// retake updates the score but keeps `is_completed` and `completed_at`.
    pub async fn submit_progress(
        &self,
        user_id: i64,
        video_id: i64,
        submission: ProgressSubmission,
    ) -> Result<ProgressRecord> {
        let now = chrono::Utc::now().to_rfc3339();

        self.db
            .transaction_async(move |tx| {
                let existing = Self::get_progress_sync(tx, user_id, video_id)?;

                match existing {
                    Some(progress) => {
                        let is_completed = progress.is_completed || submission.is_completed;
                        let completed_at = match progress.completed_at {
                            Some(at) => Some(at),
                            None if submission.is_completed => Some(now),
                            None => None,
                        };
                        tx.execute(
                            r#"
                            UPDATE user_progress
                            SET quiz_score = ?1, is_completed = ?2, completed_at = ?3
                            WHERE id = ?4
                            "#,
                            params![submission.quiz_score, is_completed, completed_at, progress.id],
                        )?;
                    }
                    None => {
                        let completed_at = submission.is_completed.then(|| now.clone());
                        tx.execute(
                            r#"
                            INSERT INTO user_progress (
                                user_id, video_id, is_completed, quiz_score, started_at, completed_at
                            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                            "#,
                            params![
                                user_id,
                                video_id,
                                submission.is_completed,
                                submission.quiz_score,
                                now,
                                completed_at
                            ],
                        )?;
                    }
                }

                Self::get_progress_sync(tx, user_id, video_id)?
                    .ok_or_else(|| anyhow::anyhow!("Progress record vanished after write"))
            })
            .await
    }

    /// Get the progress of a user on a video
    pub async fn get_progress(
        &self,
        user_id: i64,
        video_id: i64,
    ) -> Result<Option<ProgressRecord>> {
        self.db
            .execute_async(move |conn| Self::get_progress_sync(conn, user_id, video_id))
            .await
    }

    fn get_progress_sync(
        conn: &Connection,
        user_id: i64,
        video_id: i64,
    ) -> Result<Option<ProgressRecord>> {
        let result = conn
            .query_row(
                r#"
                SELECT id, user_id, video_id, quiz_score, is_completed, started_at, completed_at
                FROM user_progress WHERE user_id = ?1 AND video_id = ?2
                "#,
                params![user_id, video_id],
                parse_progress_row,
            )
            .optional()?;
        Ok(result)
    }

    /// List all progress records of a user
    pub async fn list_progress(&self, user_id: i64) -> Result<Vec<ProgressRecord>> {
        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, user_id, video_id, quiz_score, is_completed, started_at, completed_at
                    FROM user_progress WHERE user_id = ?1
                    ORDER BY video_id
                    "#,
                )?;
                let records = stmt
                    .query_map([user_id], parse_progress_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(records)
            })
            .await
    }
}

fn parse_course_row(row: &rusqlite::Row) -> rusqlite::Result<CourseRecord> {
    Ok(CourseRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        playlist_id: row.get(3)?,
        thumbnail_url: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn parse_video_row(row: &rusqlite::Row) -> rusqlite::Result<VideoRecord> {
    Ok(VideoRecord {
        id: row.get(0)?,
        course_id: row.get(1)?,
        order_index: row.get(2)?,
        title: row.get(3)?,
        youtube_id: row.get(4)?,
        duration_seconds: row.get(5)?,
    })
}

fn parse_progress_row(row: &rusqlite::Row) -> rusqlite::Result<ProgressRecord> {
    Ok(ProgressRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        video_id: row.get(2)?,
        quiz_score: row.get(3)?,
        is_completed: row.get(4)?,
        started_at: row.get(5)?,
        completed_at: row.get(6)?,
    })
}
