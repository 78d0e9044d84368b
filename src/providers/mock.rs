/*!
 * Mock provider implementations for testing.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::working()` - Always answers with valid content for the requested kind
 * - `MockProvider::intermittent(n)` - Fails every nth request with a 503
 * - `MockProvider::failing()` - Always fails with an error
 *
 * Replies can also be scripted, either as a queue consumed in order or as a
 * fixed reply per content kind.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::content::{ContentKind, PromptTemplate};
use crate::errors::ProviderError;
use crate::providers::{CompletionRequest, CompletionResponse, Provider};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with valid content
    Working,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns empty response
    Empty,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Kind of provider failure to simulate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockErrorKind {
    /// 503 from the server
    Server,
    /// Invalid API key
    Auth,
    /// 429
    RateLimit,
    /// Network failure
    Connection,
}

impl MockErrorKind {
    fn to_error(self, count: usize) -> ProviderError {
        match self {
            Self::Server => ProviderError::ApiError {
                status_code: 503,
                message: format!("Simulated server failure (request #{})", count + 1),
            },
            Self::Auth => {
                ProviderError::AuthenticationError("Simulated invalid API key".to_string())
            }
            Self::RateLimit => ProviderError::RateLimitExceeded("Simulated rate limit".to_string()),
            Self::Connection => {
                ProviderError::ConnectionError("Simulated connection reset".to_string())
            }
        }
    }
}

/// A scripted reply
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Answer with this raw text
    Text(String),
    /// Fail with this error
    Error(MockErrorKind),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// Mock provider for testing generation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Replies consumed in order before any other rule applies
    script: Arc<Mutex<VecDeque<MockReply>>>,
    /// Fixed replies per content kind
    kind_replies: HashMap<ContentKind, MockReply>,
    /// Every request received, shared between clones
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            script: Arc::new(Mutex::new(VecDeque::new())),
            kind_replies: HashMap::new(),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that answers after `delay_ms`
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Queue replies to be returned in order
    pub fn with_script(self, replies: Vec<MockReply>) -> Self {
        self.script.lock().extend(replies);
        self
    }

    /// Always answer requests for `kind` with `reply`
    pub fn with_kind_reply(mut self, kind: ContentKind, reply: MockReply) -> Self {
        self.kind_replies.insert(kind, reply);
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Copy of every request received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    /// Content kind a request asks for, judged by its system prompt
    pub fn requested_kind(request: &CompletionRequest) -> ContentKind {
        match request.system.as_deref() {
            Some(system) if system == PromptTemplate::FLASHCARD_GENERATOR => {
                ContentKind::Flashcards
            }
            _ => ContentKind::Quiz,
        }
    }

    /// A valid quiz answer
    pub fn sample_quiz_json() -> String {
        serde_json::json!({
            "video_title": "Intro to Recursion",
            "quiz": [
                {
                    "question": "What is a recursive function?",
                    "options": ["A loop", "A function that calls itself", "A variable", "A class"],
                    "correct": 1,
                    "explanation": "Recursion means a function invokes itself."
                },
                {
                    "question": "What stops infinite recursion?",
                    "options": ["A base case", "A global", "A comment", "A type"],
                    "correct": 0,
                    "explanation": "The base case ends the chain of calls."
                },
                {
                    "question": "Which structure tracks recursive calls?",
                    "options": ["Heap", "Queue", "Call stack", "Register"],
                    "correct": 2,
                    "explanation": "Each call pushes a frame on the call stack."
                }
            ]
        })
        .to_string()
    }

    /// A valid flashcard answer
    pub fn sample_flashcards_json() -> String {
        serde_json::json!({
            "video_title": "Intro to Recursion",
            "flashcards": [
                {"front": "Recursion", "back": "A function calling itself"},
                {"front": "Base case", "back": "The condition that ends recursion"},
                {"front": "Recursive case", "back": "The step that calls the function again"},
                {"front": "Call stack", "back": "Frames of active function calls"},
                {"front": "Stack overflow", "back": "Running out of stack from too deep recursion"}
            ]
        })
        .to_string()
    }

    fn reply(&self, reply: MockReply, count: usize) -> Result<CompletionResponse, ProviderError> {
        match reply {
            MockReply::Text(text) => Ok(Self::response(text)),
            MockReply::Error(kind) => Err(kind.to_error(count)),
        }
    }

    fn response(text: String) -> CompletionResponse {
        let completion_tokens = (text.len() / 4) as u64;
        CompletionResponse {
            text,
            prompt_tokens: Some(10),
            completion_tokens: Some(completion_tokens),
        }
    }

    fn valid_content(kind: ContentKind) -> String {
        match kind {
            ContentKind::Quiz => Self::sample_quiz_json(),
            ContentKind::Flashcards => Self::sample_flashcards_json(),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        let kind = Self::requested_kind(&request);
        self.requests.lock().push(request);

        let scripted = self.script.lock().pop_front();
        if let Some(reply) = scripted {
            return self.reply(reply, count);
        }
        if let Some(reply) = self.kind_replies.get(&kind) {
            return self.reply(reply.clone(), count);
        }

        match self.behavior {
            MockBehavior::Working => Ok(Self::response(Self::valid_content(kind))),

            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(MockErrorKind::Server.to_error(count))
                } else {
                    Ok(Self::response(Self::valid_content(kind)))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Empty => Ok(CompletionResponse {
                text: String::new(),
                prompt_tokens: Some(0),
                completion_tokens: Some(0),
            }),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(Self::response(Self::valid_content(kind)))
            }
        }
    }
}
