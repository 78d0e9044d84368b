/*!
 * In-memory transcript source.
 *
 * Serves fixed caption tracks, which makes transcript-dependent behavior
 * reproducible in tests and benchmarks.
 */

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{CaptionSnippet, CaptionTrack, TranscriptSource};
use crate::errors::TranscriptError;

/// Transcript source backed by a map of caption tracks
#[derive(Debug, Clone, Default)]
pub struct StaticTranscriptSource {
    tracks: HashMap<String, Vec<CaptionTrack>>,
    unknown_videos: HashSet<String>,
    delay: Option<Duration>,
    fetch_count: Arc<AtomicUsize>,
}

impl StaticTranscriptSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a caption track; each line becomes a two-second snippet
    pub fn with_captions(mut self, video_id: &str, language: &str, lines: &[&str]) -> Self {
        let snippets = lines
            .iter()
            .enumerate()
            .map(|(i, line)| CaptionSnippet::new(*line, i as f64 * 2.0, 2.0))
            .collect();
        self.tracks
            .entry(video_id.to_string())
            .or_default()
            .push(CaptionTrack {
                language: language.to_string(),
                snippets,
            });
        self
    }

    /// Make `video_id` answer as not found
    pub fn with_unknown_video(mut self, video_id: &str) -> Self {
        self.unknown_videos.insert(video_id.to_string());
        self
    }

    /// Delay every fetch
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of fetches served so far (shared between clones)
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranscriptSource for StaticTranscriptSource {
    async fn fetch(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> Result<CaptionTrack, TranscriptError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.unknown_videos.contains(video_id) {
            return Err(TranscriptError::VideoNotFound(video_id.to_string()));
        }

        let tracks = self.tracks.get(video_id);
        languages
            .iter()
            .find_map(|lang| {
                tracks.and_then(|tracks| tracks.iter().find(|t| &t.language == lang))
            })
            .cloned()
            .ok_or_else(|| TranscriptError::NoCaptions {
                video_id: video_id.to_string(),
                languages: languages.join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn langs(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[tokio::test]
    async fn test_fetch_withFallbackLanguage_shouldUseFirstAvailable() {
        let source = StaticTranscriptSource::new().with_captions("vid", "hi", &["namaste"]);

        let track = source.fetch("vid", &langs(&["en", "hi"])).await.unwrap();

        assert_eq!(track.language, "hi");
        assert_eq!(track.snippets[0].text, "namaste");
    }

    #[tokio::test]
    async fn test_fetch_withPrimaryAndFallback_shouldPreferPrimary() {
        let source = StaticTranscriptSource::new()
            .with_captions("vid", "hi", &["namaste"])
            .with_captions("vid", "en", &["hello"]);

        let track = source.fetch("vid", &langs(&["en", "hi"])).await.unwrap();

        assert_eq!(track.language, "en");
    }

    #[tokio::test]
    async fn test_fetch_withUnknownVideo_shouldReturnNotFound() {
        let source = StaticTranscriptSource::new().with_unknown_video("gone");

        let result = source.fetch("gone", &langs(&["en"])).await;

        assert!(matches!(result, Err(TranscriptError::VideoNotFound(_))));
        assert_eq!(source.fetch_count(), 1);
    }
}
