/*!
 * Prompt templates for content generation.
 *
 * A prompt is a fixed system instruction for the content kind, the video
 * content verbatim, and the format instructions derived from the target
 * schema. Building a prompt performs substitution only.
 */

use super::instructions::format_instructions;
use super::schema::{ContentKind, SchemaDescriptor};

/// System prompt template for one content kind.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template text
    template: &'static str,
}

impl PromptTemplate {
    /// Quiz generation instruction.
    pub const QUIZ_GENERATOR: &'static str = "You are an expert educational content generator. Your task is to analyze the provided video content (transcript/topic) \
and generate exactly **3 difficult, knowledge-based multiple-choice questions** that serve as a 'Mastery Gate'. \
The output MUST strictly follow the provided JSON schema. Do not include any text outside the JSON block.";

    /// Flashcard generation instruction.
    pub const FLASHCARD_GENERATOR: &'static str = "You are an expert educational content generator. Your task is to analyze the provided video content (transcript/topic) \
and generate exactly **5 key concept flashcards**. Each flashcard must have a clear 'front' (term) and 'back' (definition). \
The output MUST strictly follow the provided JSON schema. Do not include any text outside the JSON block.";

    /// Template for the given content kind
    pub fn for_kind(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Quiz => Self {
                template: Self::QUIZ_GENERATOR,
            },
            ContentKind::Flashcards => Self {
                template: Self::FLASHCARD_GENERATOR,
            },
        }
    }

    /// The rendered system prompt
    pub fn render(&self) -> &'static str {
        self.template
    }
}

/// A message sent to the model provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessage {
    /// "system" or "user"
    pub role: &'static str,
    pub content: String,
}

impl PromptMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// The complete request for one content generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload {
    /// Which schema the response must follow
    pub kind: ContentKind,

    /// The system instruction
    pub system: String,

    /// User messages in order: content, format instructions, then any feedback
    pub messages: Vec<PromptMessage>,
}

impl PromptPayload {
    /// Return a copy with a corrective message appended.
    ///
    /// Used when the previous model answer failed schema validation.
    pub fn with_validation_feedback(&self, previous_output: &str, error: &str) -> Self {
        let mut payload = self.clone();
        payload.messages.push(PromptMessage::user(format!(
            "Your previous answer was rejected because it does not match the output schema: {}\n\
             Previous answer:\n{}\n\
             Respond again with a corrected JSON object only.",
            error,
            truncate_for_feedback(previous_output)
        )));
        payload
    }

    /// The user message contents, in order
    pub fn user_messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(|m| m.content.as_str())
    }

    /// Rough size of the prompt in characters
    pub fn char_count(&self) -> usize {
        self.system.chars().count()
            + self
                .messages
                .iter()
                .map(|m| m.content.chars().count())
                .sum::<usize>()
    }
}

const FEEDBACK_ECHO_LIMIT: usize = 4000;

fn truncate_for_feedback(text: &str) -> String {
    if text.chars().count() > FEEDBACK_ECHO_LIMIT {
        let mut truncated: String = text.chars().take(FEEDBACK_ECHO_LIMIT).collect();
        truncated.push_str("...");
        truncated
    } else {
        text.to_string()
    }
}

/// Build the prompt for generating content of `descriptor`'s kind from `content_text`.
pub fn build_prompt(content_text: &str, descriptor: &SchemaDescriptor) -> PromptPayload {
    PromptPayload {
        kind: descriptor.kind,
        system: PromptTemplate::for_kind(descriptor.kind).render().to_string(),
        messages: vec![
            PromptMessage::user(format!("Video Content: {}", content_text)),
            PromptMessage::user(format!("Output Format: {}", format_instructions(descriptor))),
        ],
    }
}
