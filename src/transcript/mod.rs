/*!
 * Transcript retrieval for videos.
 *
 * A `TranscriptSource` talks to a captioning service. The `TranscriptFetcher`
 * wraps a source with a timeout and the degradation policy: any failure is
 * turned into a `Transcript::Degraded` placeholder so content generation can
 * continue from the video identifier alone.
 */

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::TranscriptError;

pub mod static_source;
pub mod video_id;
pub mod youtube;

pub use static_source::StaticTranscriptSource;
pub use video_id::parse_video_id;
pub use youtube::YouTubeTranscriptSource;

/// Prefix of the placeholder used when no transcript could be fetched
pub const PLACEHOLDER_PREFIX: &str =
    "Transcript not available. Use the video ID and topic to generate the quiz.";

/// One timed caption line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSnippet {
    /// Caption text
    pub text: String,
    /// Start time in seconds
    pub start: f64,
    /// Duration in seconds
    pub duration: f64,
}

impl CaptionSnippet {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// The captions of a video in one language
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    /// Language code of the track
    pub language: String,
    pub snippets: Vec<CaptionSnippet>,
}

/// A captioning service.
#[async_trait]
pub trait TranscriptSource: Send + Sync + Debug {
    /// Fetch the captions of `video_id`, trying `languages` in order.
    async fn fetch(&self, video_id: &str, languages: &[String])
        -> Result<CaptionTrack, TranscriptError>;
}

/// Result of a transcript fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcript {
    /// Captions were found and joined into a single text
    Available {
        text: String,
        language: String,
        snippet_count: usize,
    },
    /// Captions could not be fetched; `placeholder` stands in for them
    Degraded { reason: String, placeholder: String },
}

impl Transcript {
    /// Build a degraded transcript from a failure description
    pub fn degraded(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let placeholder = format!("{} Error: {}", PLACEHOLDER_PREFIX, reason);
        Self::Degraded {
            reason,
            placeholder,
        }
    }

    /// The text to use as prompt content
    pub fn content(&self) -> &str {
        match self {
            Self::Available { text, .. } => text,
            Self::Degraded { placeholder, .. } => placeholder,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Join caption lines in temporal order into one text.
///
/// Whitespace inside a line is collapsed, empty lines are skipped and lines
/// are separated by a single space.
pub fn join_snippets(snippets: &[CaptionSnippet]) -> String {
    let mut ordered: Vec<&CaptionSnippet> = snippets.iter().collect();
    ordered.sort_by(|a, b| a.start.total_cmp(&b.start));

    ordered
        .into_iter()
        .map(|s| s.text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Default caption languages, primary first
pub fn default_languages() -> Vec<String> {
    vec!["en".to_string(), "hi".to_string()]
}

/// Fetches transcripts and applies the degradation policy.
#[derive(Debug, Clone)]
pub struct TranscriptFetcher {
    source: Arc<dyn TranscriptSource>,
    languages: Vec<String>,
    timeout: Duration,
}

impl TranscriptFetcher {
    pub fn new(
        source: Arc<dyn TranscriptSource>,
        languages: Vec<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            source,
            languages,
            timeout,
        }
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Fetch the transcript of a video.
    ///
    /// Never fails: errors, timeouts and empty caption tracks all produce a
    /// `Transcript::Degraded`.
    pub async fn fetch_transcript(&self, video_id: &str) -> Transcript {
        let fetch = self.source.fetch(video_id, &self.languages);
        let result = match tokio::time::timeout(self.timeout, fetch).await {
            Ok(result) => result,
            Err(_) => Err(TranscriptError::Timeout(self.timeout)),
        };

        match result {
            Ok(track) => {
                let text = join_snippets(&track.snippets);
                if text.is_empty() {
                    warn!("Transcript for {} is empty, using placeholder", video_id);
                    return Transcript::degraded(format!(
                        "caption track '{}' contains no text",
                        track.language
                    ));
                }
                debug!(
                    "Fetched transcript for {} ({} lines, {} chars, language {})",
                    video_id,
                    track.snippets.len(),
                    text.len(),
                    track.language
                );
                Transcript::Available {
                    text,
                    language: track.language,
                    snippet_count: track.snippets.len(),
                }
            }
            Err(e) => {
                warn!("Transcript unavailable for {}: {}", video_id, e);
                Transcript::degraded(e.to_string())
            }
        }
    }
}
