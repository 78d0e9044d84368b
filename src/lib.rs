/*!
 * # quizforge
 *
 * A Rust library that turns YouTube videos into learning content: a
 * "Mastery Gate" quiz and a set of flashcards generated by a language model
 * from the video's transcript, stored as courses with per-learner progress.
 *
 * ## Features
 *
 * - Fetch video transcripts from YouTube captions, degrading to a placeholder
 *   when none are available
 * - Generate content using various AI providers:
 *   - Gemini (OpenAI-compatible endpoint)
 *   - OpenAI API
 *   - Anthropic API
 * - Strict schema validation of model output with a repair re-prompt
 * - Concurrent quiz and flashcard generation with all-or-nothing results
 * - SQLite persistence of courses, quizzes, flashcards and progress
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `transcript`: Transcript sources, video ID parsing and degradation
 * - `content`: Content schemas, format instructions and prompt building
 * - `generation`: The content generator, output parsing and retry policy
 * - `providers`: Client implementations for LLM providers:
 *   - `providers::openai`: OpenAI-compatible chat completions client
 *   - `providers::anthropic`: Anthropic API client
 *   - `providers::mock`: Scripted provider for tests
 * - `database`: SQLite storage of courses and progress
 * - `progress`: Quiz grading and the Mastery Gate
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

pub mod app_config;
pub mod app_controller;
pub mod content;
pub mod database;
pub mod errors;
pub mod generation;
pub mod progress;
pub mod providers;
pub mod transcript;

pub use app_config::Config;
pub use content::{
    ContentKind, FlashcardItem, GeneratedFlashcards, GeneratedQuiz, GenerationResult,
    QuizQuestion, StructuredContent,
};
pub use errors::{
    AggregateGenerationFailure, AppError, GenerationError, ProviderError, TranscriptError,
};
pub use generation::{ContentGenerator, GeneratorSettings};
pub use transcript::{Transcript, TranscriptFetcher};
