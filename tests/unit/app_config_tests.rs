/*!
 * Tests for application configuration functionality
 */

use std::time::Duration;

use quizforge::app_config::{Config, LogLevel, ProviderConfig, ProviderKind};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.provider, ProviderKind::Gemini);
    assert_eq!(config.generation.temperature, 0.0);
    assert_eq!(config.transcript.languages, vec!["en".to_string(), "hi".to_string()]);
    assert_eq!(config.progress.mastery_threshold, 100);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.database_path.is_none());

    let gemini = config
        .get_provider_config(&ProviderKind::Gemini)
        .expect("Gemini provider config should exist");
    assert_eq!(gemini.model, "gemini-2.5-pro");
    assert!(gemini.api_key.is_empty());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.transcript.languages = vec!["xx".to_string()];
    assert!(config.validate().is_err());
    config.transcript.languages = Vec::new();
    assert!(config.validate().is_err());
    config.transcript.languages = vec!["fr".to_string()];
    assert!(config.validate().is_ok());

    config.generation.temperature = 2.5;
    assert!(config.validate().is_err());
    config.generation.temperature = 0.7;

    config.progress.mastery_threshold = 101;
    assert!(config.validate().is_err());
    config.progress.mastery_threshold = 80;

    config.available_providers.push(ProviderConfig {
        provider_type: "ollama".to_string(),
        ..ProviderConfig::new(ProviderKind::OpenAI)
    });
    assert!(config.validate().is_err());
}

#[test]
fn test_validateProvider_withKeyFromEnvironmentLookup_shouldPass() {
    let mut config = Config::default();
    assert!(config.validate_provider().is_err());

    config.apply_api_keys_from(|name| (name == "GEMINI_API_KEY").then(|| "from-env".to_string()));

    assert!(config.validate_provider().is_ok());
    assert_eq!(config.get_api_key(), "from-env");
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let created = Config::load_or_create(&path).unwrap();
    assert!(path.exists());

    let loaded = Config::load_or_create(&path).unwrap();
    assert_eq!(loaded.get_model(), created.get_model());
    assert_eq!(loaded.transcript.languages, created.transcript.languages);
}

#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(&path, r#"{ "provider": "anthropic", "progress": { "mastery_threshold": 70 } }"#)
        .unwrap();

    let config = Config::load_or_create(&path).unwrap();

    assert_eq!(config.provider, ProviderKind::Anthropic);
    assert_eq!(config.progress.mastery_threshold, 70);
    assert_eq!(config.get_model(), "claude-3-5-sonnet-latest");
    assert_eq!(config.generation.retry_count, 3);
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(Config::load_or_create(&path).is_err());
}

#[test]
fn test_generatorSettings_shouldCarryRetryAndTimeout() {
    let mut config = Config::default();
    config.generation.retry_count = 5;
    config.generation.retry_backoff_ms = 250;

    let settings = config.generator_settings();

    assert_eq!(settings.retry.max_retries, 5);
    assert_eq!(settings.retry.backoff_base, Duration::from_millis(250));
    assert_eq!(settings.request_timeout, Duration::from_secs(120));
    assert_eq!(settings.model_name, "gemini-2.5-pro");
}

#[test]
fn test_providerKind_fromStr_shouldAcceptAliases() {
    assert_eq!("google".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
    assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAI);
    assert!("ollama".parse::<ProviderKind>().is_err());
}
