/*!
 * Error types for the quizforge application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::time::Duration;

use thiserror::Error;

use crate::content::ContentKind;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl ProviderError {
    /// Whether a failed call is worth retrying.
    ///
    /// Connection problems, timeouts, rate limiting and server-side errors are
    /// transient. Authentication failures, client errors and requests that
    /// could not be built (bad endpoint URL, invalid headers) are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::Timeout(_) | Self::RateLimitExceeded(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            Self::RequestFailed(_) | Self::ParseError(_) | Self::AuthenticationError(_) => false,
        }
    }

    /// Map a reqwest error from a client configured with `timeout`
    pub fn from_reqwest(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::from(error)
        }
    }

    /// Map a non-success HTTP status and body to the matching variant
    pub fn from_status(status_code: u16, message: String) -> Self {
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_builder() {
            Self::RequestFailed(error.to_string())
        } else if error.is_timeout() {
            Self::ConnectionError(format!("request timed out: {}", error))
        } else if error.is_connect() || error.is_request() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors raised by a captioning service
#[derive(Error, Debug)]
pub enum TranscriptError {
    /// The video exists but has no captions in any requested language
    #[error("No captions available for video {video_id} in languages [{languages}]")]
    NoCaptions {
        video_id: String,
        languages: String,
    },

    /// The captioning service does not know this video
    #[error("Video not found: {0}")]
    VideoNotFound(String),

    /// Network-level failure talking to the captioning service
    #[error("Transcript request failed: {0}")]
    RequestFailed(String),

    /// The service answered with something we could not decode
    #[error("Failed to parse caption data: {0}")]
    ParseError(String),

    /// The fetch did not complete within the configured timeout
    #[error("Transcript request timed out after {0:?}")]
    Timeout(Duration),
}

impl From<reqwest::Error> for TranscriptError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors that can occur while generating one piece of structured content
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The model provider could not be reached or refused the request
    #[error("Model invocation failed after {attempts} attempt(s): {source}")]
    ModelInvocationFailure {
        attempts: u32,
        #[source]
        source: ProviderError,
    },

    /// The model answered but the output does not conform to the target schema
    #[error("Model output does not match the {kind} schema: {reason}")]
    SchemaValidationFailure {
        kind: ContentKind,
        reason: String,
    },
}

impl GenerationError {
    /// Shorthand for a schema violation
    pub fn schema(kind: ContentKind, reason: impl Into<String>) -> Self {
        Self::SchemaValidationFailure {
            kind,
            reason: reason.into(),
        }
    }

    /// Whether this is a schema validation failure
    pub fn is_schema_failure(&self) -> bool {
        matches!(self, Self::SchemaValidationFailure { .. })
    }
}

/// One of the content generations inside `generate_all` failed.
///
/// The caller never receives partially generated content alongside this error.
#[derive(Error, Debug)]
#[error("Content generation for video {video_id} failed while generating {kind}: {source}")]
pub struct AggregateGenerationFailure {
    /// The video the request was for
    pub video_id: String,
    /// The content kind whose generation failed first
    pub kind: ContentKind,
    /// The underlying failure
    #[source]
    pub source: GenerationError,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from generation
    #[error("Generation error: {0}")]
    Generation(#[from] AggregateGenerationFailure),

    /// Error from the database layer
    #[error("Database error: {0}")]
    Database(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Database(error.to_string())
    }
}
