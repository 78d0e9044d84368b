/*!
 * Common test utilities for the quizforge test suite
 */

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tempfile::TempDir;

use quizforge::app_config::Config;
use quizforge::app_controller::Controller;
use quizforge::database::Repository;
use quizforge::generation::{ContentGenerator, GeneratorSettings, RetryPolicy};
use quizforge::providers::mock::MockProvider;
use quizforge::transcript::{default_languages, StaticTranscriptSource, TranscriptFetcher};

pub mod fixtures;

/// Video used throughout the scenario tests
pub const VIDEO_ID: &str = "abc123";

/// Caption lines of `VIDEO_ID`
pub const CAPTION_LINES: [&str; 2] = ["Intro to recursion.", "A function calls itself."];

/// Route library logs to the test output when RUST_LOG is set
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Transcript source knowing the captions of `VIDEO_ID`
pub fn caption_source() -> StaticTranscriptSource {
    StaticTranscriptSource::new().with_captions(VIDEO_ID, "en", &CAPTION_LINES)
}

/// Retry policy with millisecond backoff so failure tests stay fast
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 2,
        backoff_base: Duration::from_millis(1),
        schema_retries: 1,
    }
}

/// Generator over `provider` and `source`
pub fn generator_with(provider: MockProvider, source: StaticTranscriptSource) -> ContentGenerator {
    init_logging();
    let fetcher =
        TranscriptFetcher::new(Arc::new(source), default_languages(), Duration::from_secs(2));
    let settings = GeneratorSettings::new("test-key", "mock-model").with_retry(fast_retry());
    ContentGenerator::new(Arc::new(provider), fetcher, settings)
}

/// Generator over `provider` with the `VIDEO_ID` captions
pub fn generator(provider: MockProvider) -> ContentGenerator {
    generator_with(provider, caption_source())
}

/// Configuration with fast retries
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.generation.retry_count = 1;
    config.generation.retry_backoff_ms = 1;
    config
}

/// Controller over mocks and an in-memory database
pub fn controller(provider: MockProvider) -> Result<Controller> {
    init_logging();
    Ok(Controller::with_components(
        test_config(),
        Arc::new(provider),
        Arc::new(caption_source()),
        Repository::new_in_memory()?,
    ))
}
