//! Quill Completion Provider Layer
//!
//! Implementations of the `CompletionProvider` trait from `quill-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic, scriptable mock for testing
//! - `OfflineProvider`: Always fails permanently, forcing local fallback
//! - `GroqProvider`: OpenAI-compatible chat-completions API (Groq by default)
//!
//! # Examples
//!
//! ```
//! use quill_llm::MockProvider;
//! use quill_domain::CompletionProvider;
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.complete("test prompt").unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod groq;

use quill_domain::{ClassifiedError, CompletionProvider, FailureClass};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use groq::GroqProvider;

/// Errors that can occur during completion calls
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Upstream temporarily unavailable (HTTP 5xx, connect failure, timeout)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Prompt exceeds the model's context window
    #[error("Context too big: {0}")]
    ContextTooBig(String),

    /// Invalid response from the provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Credentials rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl ClassifiedError for LlmError {
    fn class(&self) -> FailureClass {
        match self {
            LlmError::ServiceUnavailable(_)
            | LlmError::ContextTooBig(_)
            | LlmError::RateLimitExceeded => FailureClass::Transient,
            LlmError::Authentication(_) | LlmError::ModelNotAvailable(_) => FailureClass::Permanent,
            LlmError::Communication(_) | LlmError::InvalidResponse(_) | LlmError::Other(_) => {
                FailureClass::Unknown
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error(LlmError),
}

impl MockReply {
    fn into_result(self) -> Result<String, LlmError> {
        match self {
            MockReply::Text(text) => Ok(text),
            MockReply::Error(error) => Err(error),
        }
    }
}

/// Mock completion provider for deterministic testing
///
/// Replies are resolved in this order: the next scripted reply (queued with
/// [`push_response`](Self::push_response) / [`push_error`](Self::push_error)),
/// then a reply registered for the exact prompt, then the default reply.
/// Clones share state, so a test can keep a handle and inspect the prompts
/// after handing the provider to an extractor.
///
/// # Examples
///
/// ```
/// use quill_llm::{LlmError, MockProvider};
/// use quill_domain::CompletionProvider;
///
/// // Fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.complete("any prompt").unwrap(), "Fixed response");
///
/// // Fail twice, then succeed
/// let provider = MockProvider::new("{}");
/// provider.push_error(LlmError::ServiceUnavailable("503".into()));
/// provider.push_error(LlmError::ServiceUnavailable("503".into()));
/// assert!(provider.complete("p").is_err());
/// assert!(provider.complete("p").is_err());
/// assert_eq!(provider.complete("p").unwrap(), "{}");
/// assert_eq!(provider.call_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_reply: MockReply,
    responses: Arc<Mutex<HashMap<String, MockReply>>>,
    script: Arc<Mutex<VecDeque<MockReply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_default(MockReply::Text(response.into()))
    }

    /// Create a MockProvider that fails every call with `error`
    pub fn failing(error: LlmError) -> Self {
        Self::with_default(MockReply::Error(error))
    }

    fn with_default(default_reply: MockReply) -> Self {
        Self {
            default_reply,
            responses: Arc::new(Mutex::new(HashMap::new())),
            script: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&self, prompt: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), MockReply::Text(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&self, prompt: impl Into<String>, error: LlmError) {
        lock(&self.responses).insert(prompt.into(), MockReply::Error(error));
    }

    /// Queue a response for the next call, whatever the prompt
    pub fn push_response(&self, response: impl Into<String>) {
        lock(&self.script).push_back(MockReply::Text(response.into()));
    }

    /// Queue an error for the next call, whatever the prompt
    pub fn push_error(&self, error: LlmError) {
        lock(&self.script).push_back(MockReply::Error(error));
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    /// Reset the call count and recorded prompts
    pub fn reset_call_count(&self) {
        lock(&self.prompts).clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl CompletionProvider for MockProvider {
    type Error = LlmError;

    fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        lock(&self.prompts).push(prompt.to_string());

        if let Some(reply) = lock(&self.script).pop_front() {
            return reply.into_result();
        }

        if let Some(reply) = lock(&self.responses).get(prompt) {
            return reply.clone().into_result();
        }

        self.default_reply.clone().into_result()
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

/// Provider used when no completion service should be contacted
///
/// Every call fails with a permanent error, so callers drop straight to
/// their local fallback without backing off.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

impl CompletionProvider for OfflineProvider {
    type Error = LlmError;

    fn complete(&self, _prompt: &str) -> Result<String, Self::Error> {
        Err(LlmError::ModelNotAvailable("offline mode".to_string()))
    }

    fn model_name(&self) -> &str {
        "offline"
    }
}
