use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::content::{GeneratedFlashcards, GeneratedQuiz};
use crate::database::{
    CourseDetail, CourseRecord, DatabaseConnection, ProgressRecord, Repository,
};
use crate::generation::ContentGenerator;
use crate::progress::MasteryGate;
use crate::providers::{self, Provider};
use crate::transcript::{
    parse_video_id, TranscriptFetcher, TranscriptSource, YouTubeTranscriptSource,
};

// @module: Application controller wiring generation, persistence and progress

/// Content produced for one video, with the course it was stored under
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub video_id: String,
    pub quiz: GeneratedQuiz,
    pub flashcards: GeneratedFlashcards,
    /// Absent when saving was skipped
    pub course: Option<CourseRecord>,
}

/// Graded quiz attempt and the progress it produced
#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    pub correct: usize,
    pub total: usize,
    pub mastery_threshold: u8,
    pub progress: ProgressRecord,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    generator: ContentGenerator,
    repository: Repository,
    gate: MasteryGate,
    show_progress: bool,
}

impl Controller {
    /// Build a controller with live provider and transcript clients
    pub fn from_config(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        let settings = config.generator_settings();
        let provider =
            providers::create_provider(&config.provider, &config.get_endpoint(), &settings);
        let source: Arc<dyn TranscriptSource> = Arc::new(YouTubeTranscriptSource::new(
            config.transcript.endpoint.clone(),
            config.transcript_timeout(),
        ));

        let db = match &config.database_path {
            Some(path) => DatabaseConnection::new(path)?,
            None => DatabaseConnection::new_default()?,
        };

        Ok(Self::with_components(config, provider, source, Repository::new(db)))
    }

    // @method: Create a controller from already built components
    pub fn with_components(
        config: Config,
        provider: Arc<dyn Provider>,
        source: Arc<dyn TranscriptSource>,
        repository: Repository,
    ) -> Self {
        let fetcher = TranscriptFetcher::new(
            source,
            config.transcript.languages.clone(),
            config.transcript_timeout(),
        );
        let generator = ContentGenerator::new(provider, fetcher, config.generator_settings());
        let gate = MasteryGate::new(config.progress.mastery_threshold);

        Self {
            config,
            generator,
            repository,
            gate,
            show_progress: false,
        }
    }

    /// Show a spinner on stderr while content is generated
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Generate a quiz and flashcards for a video ID or URL.
    ///
    /// Content is persisted only when both generations succeed and `save`
    /// is set.
    pub async fn generate(&self, input: &str, save: bool) -> Result<GenerationOutcome> {
        let video_id = parse_video_id(input);
        if video_id.is_empty() {
            return Err(anyhow!("A video ID or URL is required"));
        }

        let start_time = std::time::Instant::now();
        let spinner = self.spinner(&format!("Generating content for {}", video_id));

        let result = self.generator.generate_all_content(&video_id).await;
        spinner.finish_and_clear();

        let (quiz, flashcards) = result?;
        info!(
            "Generated quiz and flashcards for {} in {}",
            video_id,
            Self::format_duration(start_time.elapsed())
        );

        let course = if save {
            let course = self
                .repository
                .save_generated_content(&quiz, &flashcards, &video_id)
                .await?;
            Some(course)
        } else {
            debug!("Skipping persistence for {}", video_id);
            None
        };

        Ok(GenerationOutcome {
            video_id,
            quiz,
            flashcards,
            course,
        })
    }

    /// Stored course with all of its content
    pub async fn course_detail(&self, course_id: i64) -> Result<CourseDetail> {
        self.repository
            .get_course_detail(course_id)
            .await?
            .ok_or_else(|| anyhow!("Course not found: {}", course_id))
    }

    pub async fn list_courses(&self) -> Result<Vec<CourseRecord>> {
        self.repository.list_courses().await
    }

    /// Grade a learner's answers for a video and record the result
    pub async fn submit_answers(
        &self,
        user_id: i64,
        video_id: i64,
        answers: &[u32],
    ) -> Result<ProgressReport> {
        let quiz = self
            .repository
            .get_quiz_for_video(video_id)
            .await?
            .ok_or_else(|| anyhow!("No quiz stored for video {}", video_id))?;

        let (grade, submission) = self
            .gate
            .evaluate(&quiz.questions, answers)
            .with_context(|| format!("Failed to grade answers for video {}", video_id))?;

        if !submission.is_completed {
            warn!(
                "Score {}% is below the mastery threshold of {}%",
                grade.score,
                self.gate.threshold()
            );
        }

        let progress = self
            .repository
            .submit_progress(user_id, video_id, submission)
            .await?;

        Ok(ProgressReport {
            correct: grade.correct,
            total: grade.total,
            mastery_threshold: self.gate.threshold(),
            progress,
        })
    }

    pub async fn list_progress(&self, user_id: i64) -> Result<Vec<ProgressRecord>> {
        self.repository.list_progress(user_id).await
    }

    fn spinner(&self, message: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }

    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        if total_seconds >= 60 {
            format!("{}m {}s", total_seconds / 60, total_seconds % 60)
        } else {
            format!("{}.{:03}s", total_seconds, duration.subsec_millis())
        }
    }
}
