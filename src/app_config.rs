use anyhow::{anyhow, Context, Result};
use isolang::Language;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::generation::{GeneratorSettings, RetryPolicy};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Model provider to use
    #[serde(default)]
    pub provider: ProviderKind,

    /// Available model providers
    #[serde(default = "default_available_providers")]
    pub available_providers: Vec<ProviderConfig>,

    /// Generation settings shared by all providers
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Transcript retrieval settings
    #[serde(default)]
    pub transcript: TranscriptConfig,

    /// Progress tracking settings
    #[serde(default)]
    pub progress: ProgressConfig,

    /// SQLite database file; the user data directory is used when absent
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Model provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    // @provider: Google Gemini through its OpenAI-compatible endpoint
    #[default]
    Gemini,
    // @provider: OpenAI
    OpenAI,
    // @provider: Anthropic
    Anthropic,
}

impl ProviderKind {
    /// All provider kinds
    pub const ALL: [ProviderKind; 3] =
        [ProviderKind::Gemini, ProviderKind::OpenAI, ProviderKind::Anthropic];

    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Gemini => "Gemini",
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Gemini => "gemini".to_string(),
            Self::OpenAI => "openai".to_string(),
            Self::Anthropic => "anthropic".to_string(),
        }
    }

    /// Default service URL for this provider
    pub fn default_endpoint(&self) -> String {
        match self {
            Self::Gemini => default_gemini_endpoint(),
            Self::OpenAI => default_openai_endpoint(),
            Self::Anthropic => default_anthropic_endpoint(),
        }
    }

    /// Environment variables an API key may be read from, in priority order
    pub fn api_key_env_vars(&self) -> &'static [&'static str] {
        match self {
            Self::Gemini => &["GOOGLE_API_KEY", "GEMINI_API_KEY"],
            Self::OpenAI => &["OPENAI_API_KEY"],
            Self::Anthropic => &["ANTHROPIC_API_KEY"],
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Max output tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: ProviderKind) -> Self {
        let model = match provider_type {
            ProviderKind::Gemini => default_gemini_model(),
            ProviderKind::OpenAI => default_openai_model(),
            ProviderKind::Anthropic => default_anthropic_model(),
        };
        let endpoint = provider_type.default_endpoint();
        Self {
            provider_type: provider_type.to_lowercase_string(),
            model,
            api_key: String::new(),
            endpoint,
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Generation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GenerationConfig {
    /// Sampling temperature; 0.0 makes output as deterministic as the model allows
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Retry count for failed model invocations
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff base for retries in milliseconds, doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Re-prompts allowed after the model output fails schema validation
    #[serde(default = "default_schema_retries")]
    pub schema_retries: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            schema_retries: default_schema_retries(),
        }
    }
}

/// Transcript retrieval settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptConfig {
    /// Caption languages, primary first
    #[serde(default = "crate::transcript::default_languages")]
    pub languages: Vec<String>,

    /// Timed-text endpoint; empty selects the public API
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Timeout for one transcript fetch in seconds
    #[serde(default = "default_transcript_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            languages: crate::transcript::default_languages(),
            endpoint: String::new(),
            timeout_secs: default_transcript_timeout_secs(),
        }
    }
}

/// Progress tracking settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProgressConfig {
    /// Minimum quiz score (0-100) that marks a video as completed
    #[serde(default = "default_mastery_threshold")]
    pub mastery_threshold: u8,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            mastery_threshold: default_mastery_threshold(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_available_providers() -> Vec<ProviderConfig> {
    ProviderKind::ALL.iter().cloned().map(ProviderConfig::new).collect()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_tokens() -> u32 {
    8192
}

fn default_temperature() -> f32 {
    0.0
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_schema_retries() -> u32 {
    1
}

fn default_transcript_timeout_secs() -> u64 {
    15
}

fn default_mastery_threshold() -> u8 {
    100
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-pro".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-5-sonnet-latest".to_string()
}

impl Config {
    /// Load the configuration from `path`, writing the defaults there first
    /// when the file does not exist
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            debug!("Loaded configuration from {}", path.display());
            Ok(config)
        } else {
            warn!(
                "Config file not found at '{}', creating default config.",
                path.display()
            );
            let config = Config::default();
            config.save(path)?;
            Ok(config)
        }
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Fill empty API keys from the process environment
    pub fn apply_env_api_keys(&mut self) {
        self.apply_api_keys_from(|name| std::env::var(name).ok());
    }

    /// Fill empty API keys using `lookup` to resolve variable names
    pub fn apply_api_keys_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for kind in ProviderKind::ALL {
            let key = kind
                .api_key_env_vars()
                .iter()
                .filter_map(|name| lookup(name))
                .find(|value| !value.trim().is_empty());

            let Some(key) = key else { continue };
            let provider_str = kind.to_lowercase_string();
            if let Some(provider_config) = self
                .available_providers
                .iter_mut()
                .find(|p| p.provider_type == provider_str)
            {
                if provider_config.api_key.is_empty() {
                    provider_config.api_key = key;
                }
            }
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.transcript.languages.is_empty() {
            return Err(anyhow!("At least one transcript language is required"));
        }
        for code in &self.transcript.languages {
            let normalized = code.trim().to_lowercase();
            if Language::from_639_1(&normalized).is_none() {
                return Err(anyhow!("Invalid transcript language code: {}", code));
            }
        }

        let temperature = self.generation.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(anyhow!(
                "Temperature must be between 0.0 and 2.0, got {}",
                temperature
            ));
        }

        if self.progress.mastery_threshold > 100 {
            return Err(anyhow!(
                "Mastery threshold must be between 0 and 100, got {}",
                self.progress.mastery_threshold
            ));
        }

        for provider in &self.available_providers {
            provider
                .provider_type
                .parse::<ProviderKind>()
                .with_context(|| {
                    format!("Unknown provider in available_providers: {}", provider.provider_type)
                })?;
        }

        Ok(())
    }

    /// Validate that the active provider can be called
    pub fn validate_provider(&self) -> Result<()> {
        if self.get_api_key().is_empty() {
            return Err(anyhow!(
                "API key is required for {} provider (set it in the config or via {})",
                self.provider.display_name(),
                self.provider.api_key_env_vars().join(" or ")
            ));
        }
        if self.get_model().is_empty() {
            return Err(anyhow!(
                "Model name is required for {} provider",
                self.provider.display_name()
            ));
        }
        Ok(())
    }

    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &ProviderKind) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Active provider configuration, falling back to the provider defaults
    pub fn active_provider_config(&self) -> ProviderConfig {
        self.get_active_provider_config()
            .cloned()
            .unwrap_or_else(|| ProviderConfig::new(self.provider.clone()))
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        self.active_provider_config().model
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.active_provider_config().api_key
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        let endpoint = self.active_provider_config().endpoint;
        if endpoint.is_empty() {
            self.provider.default_endpoint()
        } else {
            endpoint
        }
    }

    /// Set the model of the active provider, adding its entry when missing
    pub fn set_model(&mut self, model: impl Into<String>) {
        let provider_str = self.provider.to_lowercase_string();
        if !self
            .available_providers
            .iter()
            .any(|p| p.provider_type == provider_str)
        {
            self.available_providers
                .push(ProviderConfig::new(self.provider.clone()));
        }
        if let Some(provider_config) = self
            .available_providers
            .iter_mut()
            .find(|p| p.provider_type == provider_str)
        {
            provider_config.model = model.into();
        }
    }

    /// Settings handed to the content generator
    pub fn generator_settings(&self) -> GeneratorSettings {
        let provider = self.active_provider_config();
        GeneratorSettings {
            api_key: provider.api_key,
            model_name: provider.model,
            sampling_temperature: self.generation.temperature,
            request_timeout: Duration::from_secs(provider.timeout_secs),
            max_tokens: provider.max_tokens,
            retry: RetryPolicy {
                max_retries: self.generation.retry_count,
                backoff_base: Duration::from_millis(self.generation.retry_backoff_ms),
                schema_retries: self.generation.schema_retries,
            },
        }
    }

    /// Timeout for one transcript fetch
    pub fn transcript_timeout(&self) -> Duration {
        Duration::from_secs(self.transcript.timeout_secs)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            provider: ProviderKind::default(),
            available_providers: default_available_providers(),
            generation: GenerationConfig::default(),
            transcript: TranscriptConfig::default(),
            progress: ProgressConfig::default(),
            database_path: None,
            log_level: LogLevel::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shouldTargetGeminiAtZeroTemperature() {
        let config = Config::default();

        assert_eq!(config.provider, ProviderKind::Gemini);
        assert_eq!(config.get_model(), "gemini-2.5-pro");
        assert_eq!(config.generation.temperature, 0.0);
        assert_eq!(config.transcript.languages, vec!["en", "hi"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_applyApiKeysFrom_shouldOnlyFillEmptyKeys() {
        let mut config = Config::default();
        config.available_providers[1].api_key = "configured".to_string();

        config.apply_api_keys_from(|name| match name {
            "GEMINI_API_KEY" => Some("from-env".to_string()),
            "OPENAI_API_KEY" => Some("ignored".to_string()),
            _ => None,
        });

        assert_eq!(config.get_api_key(), "from-env");
        assert_eq!(
            config.get_provider_config(&ProviderKind::OpenAI).unwrap().api_key,
            "configured"
        );
        assert!(config.get_provider_config(&ProviderKind::Anthropic).unwrap().api_key.is_empty());
    }

    #[test]
    fn test_applyApiKeysFrom_shouldPreferGoogleKey() {
        let mut config = Config::default();

        config.apply_api_keys_from(|name| Some(format!("value-of-{}", name)));

        assert_eq!(config.get_api_key(), "value-of-GOOGLE_API_KEY");
    }

    #[test]
    fn test_validateProvider_withoutKey_shouldNameEnvVars() {
        let config = Config::default();

        let err = config.validate_provider().unwrap_err().to_string();

        assert!(err.contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_setModel_shouldUpdateActiveProvider() {
        let mut config = Config::default();
        config.provider = ProviderKind::Anthropic;
        config.set_model("claude-opus");

        assert_eq!(config.get_model(), "claude-opus");
        assert_eq!(
            config.get_provider_config(&ProviderKind::Gemini).unwrap().model,
            "gemini-2.5-pro"
        );
    }

    #[test]
    fn test_generatorSettings_shouldReflectConfig() {
        let mut config = Config::default();
        config.generation.retry_count = 5;
        config.generation.retry_backoff_ms = 10;

        let settings = config.generator_settings();

        assert_eq!(settings.model_name, "gemini-2.5-pro");
        assert_eq!(settings.request_timeout, Duration::from_secs(120));
        assert_eq!(settings.retry.max_retries, 5);
        assert_eq!(settings.retry.backoff_base, Duration::from_millis(10));
    }
}
