// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use quizforge::app_config::{self, Config, ProviderKind};
use quizforge::app_controller::Controller;
use quizforge::progress::parse_answers;

/// CLI wrapper for ProviderKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliProvider {
    Gemini,
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
}

impl From<CliProvider> for ProviderKind {
    fn from(cli_provider: CliProvider) -> Self {
        match cli_provider {
            CliProvider::Gemini => ProviderKind::Gemini,
            CliProvider::OpenAI => ProviderKind::OpenAI,
            CliProvider::Anthropic => ProviderKind::Anthropic,
        }
    }
}

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a quiz and flashcards for a YouTube video
    Generate(GenerateArgs),

    /// Print a stored course with its videos, quizzes and flashcards
    Course {
        /// Course ID
        course_id: i64,
    },

    /// List stored courses
    Courses,

    /// Record or inspect learner progress
    #[command(subcommand)]
    Progress(ProgressCommands),

    /// Generate shell completions for quizforge
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// YouTube video ID or URL
    #[arg(value_name = "VIDEO_ID_OR_URL")]
    video: String,

    /// Model provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliProvider>,

    /// Model name to use for generation
    #[arg(short, long)]
    model: Option<String>,

    /// Print the generated content without storing it
    #[arg(long)]
    no_save: bool,
}

#[derive(Subcommand, Debug)]
enum ProgressCommands {
    /// Grade quiz answers for a video and record the result
    Submit {
        /// Learner ID
        #[arg(long)]
        user: i64,

        /// Video ID (database ID, as shown by `course`)
        #[arg(long)]
        video: i64,

        /// Comma separated 0-based answer indices, e.g. 0,2,1
        #[arg(long)]
        answers: String,
    },

    /// List progress records of a learner
    List {
        /// Learner ID
        #[arg(long)]
        user: i64,
    },
}

/// quizforge - quizzes and flashcards from YouTube videos
///
/// Fetches a video's transcript, asks a language model for a Mastery Gate
/// quiz and a set of flashcards, stores them as a course and tracks learner
/// progress.
#[derive(Parser, Debug)]
#[command(name = "quizforge")]
#[command(version)]
#[command(about = "AI-generated quizzes and flashcards from YouTube videos")]
#[command(long_about = "quizforge turns a YouTube video into a Mastery Gate quiz and flashcards.

EXAMPLES:
    quizforge generate dQw4w9WgXcQ                          # Generate and store content
    quizforge generate https://youtu.be/dQw4w9WgXcQ --no-save
    quizforge generate -p openai -m gpt-4o dQw4w9WgXcQ     # Use a specific provider and model
    quizforge course 1                                      # Show a stored course
    quizforge progress submit --user 1 --video 1 --answers 0,2,1
    quizforge completions bash > quizforge.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. API keys may also come from GOOGLE_API_KEY,
    GEMINI_API_KEY, OPENAI_API_KEY or ANTHROPIC_API_KEY.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌",
            Level::Warn => "🚧",
            Level::Info => "✨",
            Level::Debug => "🔍",
            Level::Trace => "📋",
        }
    }

    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // The global max level may be raised after init
        metadata.level() <= self.level.max(log::max_level())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "quizforge", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        log::set_max_level(LevelFilter::from(level.clone()));
    }

    let mut config = Config::load_or_create(&cli.config)?;
    config.apply_env_api_keys();
    match &cli.log_level {
        Some(level) => config.log_level = level.clone().into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    match cli.command {
        Commands::Generate(args) => run_generate(config, args).await,
        Commands::Course { course_id } => {
            let controller = Controller::from_config(config)?;
            print_json(&controller.course_detail(course_id).await?)
        }
        Commands::Courses => {
            let controller = Controller::from_config(config)?;
            print_json(&controller.list_courses().await?)
        }
        Commands::Progress(ProgressCommands::Submit { user, video, answers }) => {
            let answers = parse_answers(&answers).context("Failed to parse --answers")?;
            let controller = Controller::from_config(config)?;
            let report = controller.submit_answers(user, video, &answers).await?;
            if report.progress.is_completed {
                info!("Video {} completed with {}/{} correct", video, report.correct, report.total);
            }
            print_json(&report)
        }
        Commands::Progress(ProgressCommands::List { user }) => {
            let controller = Controller::from_config(config)?;
            print_json(&controller.list_progress(user).await?)
        }
        Commands::Completions { .. } => Ok(()),
    }
}

async fn run_generate(mut config: Config, args: GenerateArgs) -> Result<()> {
    if let Some(provider) = args.provider {
        config.provider = provider.into();
    }
    if let Some(model) = args.model {
        config.set_model(model);
    }
    config.validate_provider()?;

    info!(
        "Using {} with model {}",
        config.provider.display_name(),
        config.get_model()
    );

    let controller = Controller::from_config(config)?.with_progress(true);
    let outcome = controller.generate(&args.video, !args.no_save).await?;

    if let Some(course) = &outcome.course {
        info!("Stored as course {} ({})", course.id, course.title);
    }
    print_json(&outcome)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

impl From<CliLogLevel> for LevelFilter {
    fn from(level: CliLogLevel) -> Self {
        app_config::LogLevel::from(level).to_level_filter()
    }
}
