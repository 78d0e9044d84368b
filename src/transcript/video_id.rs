/*!
 * Video identifier normalization.
 */

use once_cell::sync::Lazy;
use regex::Regex;

static VIDEO_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:youtube\.com/(?:watch\?(?:.*&)?v=|embed/|shorts/|live/|v/)|youtu\.be/)([A-Za-z0-9_-]{11})",
    )
    .unwrap()
});

/// Extract the 11-character video ID from a YouTube URL.
///
/// Input that is not a recognized URL is returned trimmed and otherwise
/// unchanged; the captioning service decides whether it is valid.
pub fn parse_video_id(input: &str) -> String {
    let input = input.trim();
    VIDEO_URL_REGEX
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| input.to_string())
}
