/*!
 * Tests for error types
 */

use std::error::Error;
use std::time::Duration;

use quizforge::content::ContentKind;
use quizforge::errors::{
    AggregateGenerationFailure, AppError, GenerationError, ProviderError, TranscriptError,
};

#[test]
fn test_providerError_isRetryable_shouldSplitTransientFromFatal() {
    assert!(ProviderError::ConnectionError("reset".into()).is_retryable());
    assert!(ProviderError::Timeout(Duration::from_secs(1)).is_retryable());
    assert!(ProviderError::RateLimitExceeded("slow down".into()).is_retryable());
    assert!(
        ProviderError::ApiError { status_code: 502, message: "bad gateway".into() }.is_retryable()
    );

    assert!(!ProviderError::AuthenticationError("bad key".into()).is_retryable());
    assert!(
        !ProviderError::ApiError { status_code: 400, message: "bad request".into() }.is_retryable()
    );
    assert!(!ProviderError::ParseError("garbage".into()).is_retryable());
    assert!(!ProviderError::RequestFailed("relative URL without a base".into()).is_retryable());
}

#[test]
fn test_providerError_fromStatus_shouldMapAuthAndRateLimit() {
    assert!(matches!(
        ProviderError::from_status(401, "nope".into()),
        ProviderError::AuthenticationError(_)
    ));
    assert!(matches!(
        ProviderError::from_status(429, "later".into()),
        ProviderError::RateLimitExceeded(_)
    ));
    assert!(matches!(
        ProviderError::from_status(500, "oops".into()),
        ProviderError::ApiError { status_code: 500, .. }
    ));
}

#[test]
fn test_aggregateFailure_shouldNameKindAndKeepSource() {
    let failure = AggregateGenerationFailure {
        video_id: "abc123".to_string(),
        kind: ContentKind::Flashcards,
        source: GenerationError::schema(
            ContentKind::Flashcards,
            "field `flashcards` must contain exactly 5 item(s), found 4",
        ),
    };

    let message = failure.to_string();

    assert!(message.contains("abc123"));
    assert!(message.contains("flashcards"));
    assert!(failure.source().is_some());
    assert!(failure.source.is_schema_failure());
}

#[test]
fn test_generationError_modelFailure_shouldReportAttempts() {
    let error = GenerationError::ModelInvocationFailure {
        attempts: 3,
        source: ProviderError::ConnectionError("reset".into()),
    };

    assert!(error.to_string().contains("3 attempt(s)"));
    assert!(!error.is_schema_failure());
}

#[test]
fn test_transcriptError_noCaptions_shouldListLanguages() {
    let error = TranscriptError::NoCaptions {
        video_id: "abc123".to_string(),
        languages: "en, hi".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "No captions available for video abc123 in languages [en, hi]"
    );
}

#[test]
fn test_appError_conversions_shouldWrapSources() {
    let from_provider: AppError = ProviderError::Timeout(Duration::from_secs(2)).into();
    assert!(matches!(from_provider, AppError::Provider(_)));

    let from_io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
    assert!(matches!(from_io, AppError::File(_)));

    let from_anyhow: AppError = anyhow::anyhow!("something else").into();
    assert_eq!(from_anyhow.to_string(), "Unknown error: something else");
}
