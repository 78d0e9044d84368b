/*!
 * Provider implementations for different model services.
 *
 * This module contains client implementations for the supported LLM providers:
 * - OpenAI: OpenAI chat completions API (also used for Gemini through its
 *   OpenAI-compatible endpoint)
 * - Anthropic: Anthropic messages API
 * - Mock: scripted provider for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::app_config::ProviderKind;
use crate::content::PromptPayload;
use crate::errors::ProviderError;
use crate::generation::GeneratorSettings;

pub mod anthropic;
pub mod mock;
pub mod openai;

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Role of the message sender (user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

/// Provider-neutral completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// The model to use
    pub model: String,
    /// System prompt to guide the model
    pub system: Option<String>,
    /// Conversation messages, in order
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum number of tokens to generate
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Create a new request for `model`
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: None,
            messages: Vec::new(),
            temperature: 0.0,
            max_tokens: 4096,
        }
    }

    /// Build a request from a generation prompt
    pub fn from_prompt(payload: &PromptPayload, model: impl Into<String>) -> Self {
        let mut request = Self::new(model).system(payload.system.clone());
        for message in &payload.messages {
            request = request.add_message(message.role, message.content.clone());
        }
        request
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the maximum number of output tokens
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Provider-neutral completion response
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionResponse {
    /// The generated text
    pub text: String,
    /// Prompt tokens, when the provider reports them
    pub prompt_tokens: Option<u64>,
    /// Completion tokens, when the provider reports them
    pub completion_tokens: Option<u64>,
}

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the content generator.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Short provider name used in logs
    fn name(&self) -> &str;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<CompletionResponse, ProviderError>` - The response from the provider or an error
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError>;
}

/// Create the client for `kind` at `endpoint` using the generator's credentials
pub fn create_provider(
    kind: &ProviderKind,
    endpoint: &str,
    settings: &GeneratorSettings,
) -> Arc<dyn Provider> {
    match kind {
        ProviderKind::OpenAI | ProviderKind::Gemini => Arc::new(openai::OpenAI::new(
            kind.display_name(),
            settings.api_key.clone(),
            endpoint,
            settings.request_timeout,
        )),
        ProviderKind::Anthropic => Arc::new(anthropic::Anthropic::new(
            settings.api_key.clone(),
            endpoint,
            settings.request_timeout,
        )),
    }
}
