use std::fmt;
use std::time::Duration;

/// Retry behavior for one content generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after a retryable provider failure
    pub max_retries: u32,
    /// Backoff before the first retry, doubled on each further retry
    pub backoff_base: Duration,
    /// Re-prompts after output that fails schema validation
    pub schema_retries: u32,
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff_base: Duration::ZERO,
            schema_retries: 0,
        }
    }

    /// Delay before retry number `retry` (1-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.backoff_base.saturating_mul(1u32 << exponent)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base: Duration::from_millis(1000),
            schema_retries: 1,
        }
    }
}

/// Explicit settings for the content generator.
///
/// Nothing is read from the environment after these are built.
#[derive(Clone, PartialEq)]
pub struct GeneratorSettings {
    /// Credential for the model provider
    pub api_key: String,
    /// Model identifier sent with every request
    pub model_name: String,
    /// Sampling temperature
    pub sampling_temperature: f32,
    /// Upper bound on a single model invocation
    pub request_timeout: Duration,
    /// Maximum number of output tokens
    pub max_tokens: u32,
    pub retry: RetryPolicy,
}

impl GeneratorSettings {
    pub fn new(api_key: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model_name: model_name.into(),
            sampling_temperature: 0.0,
            request_timeout: Duration::from_secs(120),
            max_tokens: 8192,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.sampling_temperature = temperature;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl fmt::Debug for GeneratorSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorSettings")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("model_name", &self.model_name)
            .field("sampling_temperature", &self.sampling_temperature)
            .field("request_timeout", &self.request_timeout)
            .field("max_tokens", &self.max_tokens)
            .field("retry", &self.retry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_shouldDoubleEachRetry() {
        let policy = RetryPolicy {
            max_retries: 4,
            backoff_base: Duration::from_millis(100),
            schema_retries: 1,
        };

        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(4), Duration::from_millis(800));
    }

    #[test]
    fn test_debug_shouldNotLeakApiKey() {
        let settings = GeneratorSettings::new("secret-key", "gemini-2.5-pro");

        let printed = format!("{:?}", settings);

        assert!(!printed.contains("secret-key"));
        assert!(printed.contains("<redacted>"));
        assert!(printed.contains("gemini-2.5-pro"));
    }
}
