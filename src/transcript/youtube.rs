/*!
 * YouTube timed-text client.
 *
 * Requests caption tracks in the `json3` format, one language at a time,
 * until a track with text is found. A failure for one language moves on to
 * the next; the last failure is reported when no language yields a track.
 */

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use super::{CaptionSnippet, CaptionTrack, TranscriptSource};
use crate::errors::TranscriptError;

/// Default timed-text endpoint
pub const DEFAULT_TIMEDTEXT_ENDPOINT: &str = "https://www.youtube.com/api/timedtext";

/// Caption payload in the `json3` format
#[derive(Debug, Deserialize)]
struct TimedTextResponse {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimedTextEvent {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    #[serde(default)]
    segs: Vec<TimedTextSegment>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSegment {
    #[serde(default)]
    utf8: String,
}

/// Convert a `json3` body into caption snippets.
///
/// Events without segments (window and style events) are dropped.
pub fn parse_json3(body: &str) -> Result<Vec<CaptionSnippet>, TranscriptError> {
    let response: TimedTextResponse = serde_json::from_str(body)
        .map_err(|e| TranscriptError::ParseError(e.to_string()))?;

    Ok(response
        .events
        .into_iter()
        .filter(|event| !event.segs.is_empty())
        .map(|event| {
            let text: String = event.segs.into_iter().map(|s| s.utf8).collect();
            CaptionSnippet {
                text,
                start: event.t_start_ms as f64 / 1000.0,
                duration: event.d_duration_ms as f64 / 1000.0,
            }
        })
        .collect())
}

/// Client for the YouTube timed-text API
#[derive(Debug)]
pub struct YouTubeTranscriptSource {
    /// HTTP client for API requests
    client: Client,
    /// Timed-text endpoint URL
    endpoint: String,
}

impl YouTubeTranscriptSource {
    /// Create a new client; an empty endpoint selects the public API
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let endpoint = endpoint.into();
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            endpoint: if endpoint.is_empty() {
                DEFAULT_TIMEDTEXT_ENDPOINT.to_string()
            } else {
                endpoint
            },
        }
    }

    fn track_url(&self, video_id: &str, language: &str) -> Result<Url, TranscriptError> {
        Url::parse_with_params(
            &self.endpoint,
            &[("v", video_id), ("lang", language), ("fmt", "json3")],
        )
        .map_err(|e| {
            TranscriptError::RequestFailed(format!("invalid endpoint {}: {}", self.endpoint, e))
        })
    }

    async fn fetch_track(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Option<Vec<CaptionSnippet>>, TranscriptError> {
        let url = self.track_url(video_id, language)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(TranscriptError::VideoNotFound(video_id.to_string()));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Timed-text API error ({}): {}", status, error_text);
            return Err(TranscriptError::RequestFailed(format!(
                "timed-text API responded with {}",
                status
            )));
        }

        // The API answers 200 with an empty body when the language has no track
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        let snippets = parse_json3(&body)?;
        if snippets.iter().all(|s| s.text.trim().is_empty()) {
            Ok(None)
        } else {
            Ok(Some(snippets))
        }
    }
}

#[async_trait]
impl TranscriptSource for YouTubeTranscriptSource {
    async fn fetch(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> Result<CaptionTrack, TranscriptError> {
        let mut last_error = None;

        for language in languages {
            match self.fetch_track(video_id, language).await {
                Ok(Some(snippets)) => {
                    return Ok(CaptionTrack {
                        language: language.clone(),
                        snippets,
                    });
                }
                Ok(None) => debug!("No '{}' captions for {}", language, video_id),
                Err(e) => {
                    warn!("Fetching '{}' captions for {} failed: {}", language, video_id, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| TranscriptError::NoCaptions {
            video_id: video_id.to_string(),
            languages: languages.join(", "),
        }))
    }
}
