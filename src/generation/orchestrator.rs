/*!
 * Content generation orchestrator.
 *
 * One generation is: build the prompt for the target schema, invoke the model
 * (retrying transient provider failures with exponential backoff), extract
 * and validate the structured output (re-prompting once with the validation
 * error when it does not conform). `generate_all` runs the quiz and the
 * flashcard generations concurrently over a single transcript fetch and
 * returns both or neither.
 */

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

use crate::content::{
    build_prompt, ContentKind, ContentSchema, GeneratedFlashcards, GeneratedQuiz,
    GenerationResult, PromptPayload, StructuredContent,
};
use crate::errors::{AggregateGenerationFailure, GenerationError, ProviderError};
use crate::providers::{CompletionRequest, CompletionResponse, Provider};
use crate::transcript::{Transcript, TranscriptFetcher};

use super::parser::parse_content;
use super::settings::GeneratorSettings;

/// Statistics for a single content generation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Model invocations, including retries
    pub attempts: u32,
    /// Re-prompts after schema validation failures
    pub schema_repairs: u32,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub duration: Duration,
}

impl GenerationStats {
    fn record_usage(&mut self, response: &CompletionResponse) {
        self.prompt_tokens += response.prompt_tokens.unwrap_or(0);
        self.completion_tokens += response.completion_tokens.unwrap_or(0);
    }
}

/// Generates structured learning content for videos
#[derive(Debug, Clone)]
pub struct ContentGenerator {
    /// Model provider
    provider: Arc<dyn Provider>,
    /// Transcript fetcher with its degradation policy
    transcripts: TranscriptFetcher,
    settings: GeneratorSettings,
}

impl ContentGenerator {
    /// Create a new generator
    pub fn new(
        provider: Arc<dyn Provider>,
        transcripts: TranscriptFetcher,
        settings: GeneratorSettings,
    ) -> Self {
        Self {
            provider,
            transcripts,
            settings,
        }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    pub fn transcripts(&self) -> &TranscriptFetcher {
        &self.transcripts
    }

    /// Generate one kind of content for a video.
    pub async fn generate(
        &self,
        video_id: &str,
        kind: ContentKind,
    ) -> Result<StructuredContent, GenerationError> {
        let transcript = self.transcripts.fetch_transcript(video_id).await;
        self.generate_from_transcript(&transcript, kind).await
    }

    /// Generate one kind of content from an already fetched transcript.
    pub async fn generate_from_transcript(
        &self,
        transcript: &Transcript,
        kind: ContentKind,
    ) -> Result<StructuredContent, GenerationError> {
        match kind {
            ContentKind::Quiz => self
                .generate_content::<GeneratedQuiz>(transcript.content())
                .await
                .map(StructuredContent::from),
            ContentKind::Flashcards => self
                .generate_content::<GeneratedFlashcards>(transcript.content())
                .await
                .map(StructuredContent::from),
        }
    }

    /// Generate content of type `T` from the given prompt content.
    pub async fn generate_content<T: ContentSchema>(
        &self,
        content_text: &str,
    ) -> Result<T, GenerationError> {
        let (content, stats) = self.generate_content_with_stats::<T>(content_text).await?;
        info!(
            "Generated {} '{}' in {:.2}s ({} attempt(s), {} schema repair(s), {} prompt / {} completion tokens)",
            T::KIND,
            content.video_title(),
            stats.duration.as_secs_f64(),
            stats.attempts,
            stats.schema_repairs,
            stats.prompt_tokens,
            stats.completion_tokens
        );
        Ok(content)
    }

    /// Like `generate_content`, also returning the generation statistics.
    pub async fn generate_content_with_stats<T: ContentSchema>(
        &self,
        content_text: &str,
    ) -> Result<(T, GenerationStats), GenerationError> {
        let start = Instant::now();
        let base_prompt = build_prompt(content_text, &T::descriptor());
        let mut prompt = base_prompt.clone();
        let mut stats = GenerationStats::default();

        debug!(
            "Requesting {} from {} ({} prompt chars)",
            T::KIND,
            self.provider.name(),
            prompt.char_count()
        );

        loop {
            let response = self.invoke(&prompt, &mut stats).await?;

            match parse_content::<T>(&response.text) {
                Ok(content) => {
                    stats.duration = start.elapsed();
                    return Ok((content, stats));
                }
                Err(GenerationError::SchemaValidationFailure { kind, reason })
                    if stats.schema_repairs < self.settings.retry.schema_retries =>
                {
                    stats.schema_repairs += 1;
                    warn!(
                        "{} output failed validation ({}), re-prompting ({}/{})",
                        kind, reason, stats.schema_repairs, self.settings.retry.schema_retries
                    );
                    prompt = base_prompt.with_validation_feedback(&response.text, &reason);
                }
                Err(e) => {
                    error!("{} generation failed: {}", T::KIND, e);
                    return Err(e);
                }
            }
        }
    }

    /// Invoke the provider, retrying retryable failures with exponential backoff.
    async fn invoke(
        &self,
        prompt: &PromptPayload,
        stats: &mut GenerationStats,
    ) -> Result<CompletionResponse, GenerationError> {
        let policy = &self.settings.retry;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            stats.attempts += 1;

            let request = CompletionRequest::from_prompt(prompt, self.settings.model_name.as_str())
                .temperature(self.settings.sampling_temperature)
                .max_tokens(self.settings.max_tokens);

            let result = match tokio::time::timeout(
                self.settings.request_timeout,
                self.provider.complete(request),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout(self.settings.request_timeout)),
            };

            match result {
                Ok(response) => {
                    stats.record_usage(&response);
                    return Ok(response);
                }
                Err(e) if e.is_retryable() && attempt <= policy.max_retries => {
                    let backoff = policy.backoff(attempt);
                    warn!(
                        "{} request failed: {} - attempt {}/{}, retrying in {:?}",
                        self.provider.name(),
                        e,
                        attempt,
                        policy.max_retries + 1,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    error!(
                        "{} request failed after {} attempt(s): {}",
                        self.provider.name(),
                        attempt,
                        e
                    );
                    return Err(GenerationError::ModelInvocationFailure {
                        attempts: attempt,
                        source: e,
                    });
                }
            }
        }
    }

    /// Generate the quiz and the flashcards for a video.
    ///
    /// The transcript is fetched once and shared by both generations, which run
    /// concurrently. If either fails the other is cancelled and no content is
    /// returned.
    pub async fn generate_all(
        &self,
        video_id: &str,
    ) -> Result<GenerationResult, AggregateGenerationFailure> {
        let transcript = self.transcripts.fetch_transcript(video_id).await;
        if transcript.is_degraded() {
            info!("Generating content for {} without a transcript", video_id);
        }
        self.generate_all_from_transcript(video_id, &transcript).await
    }

    /// `generate_all` over an already fetched transcript.
    pub async fn generate_all_from_transcript(
        &self,
        video_id: &str,
        transcript: &Transcript,
    ) -> Result<GenerationResult, AggregateGenerationFailure> {
        let content = transcript.content();

        let quiz = async {
            self.generate_content::<GeneratedQuiz>(content)
                .await
                .map_err(|e| (ContentKind::Quiz, e))
        };
        let flashcards = async {
            self.generate_content::<GeneratedFlashcards>(content)
                .await
                .map_err(|e| (ContentKind::Flashcards, e))
        };

        let (quiz, flashcards) =
            futures::try_join!(quiz, flashcards).map_err(|(kind, source)| {
                AggregateGenerationFailure {
                    video_id: video_id.to_string(),
                    kind,
                    source,
                }
            })?;

        Ok(GenerationResult { quiz, flashcards })
    }

    /// Generate both content types and return them as a pair.
    pub async fn generate_all_content(
        &self,
        video_id: &str,
    ) -> Result<(GeneratedQuiz, GeneratedFlashcards), AggregateGenerationFailure> {
        self.generate_all(video_id)
            .await
            .map(GenerationResult::into_parts)
    }
}
