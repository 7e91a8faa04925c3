//! Groq Provider Implementation
//!
//! Talks to any OpenAI-compatible `chat/completions` endpoint; Groq is the
//! default.
//!
//! # Features
//!
//! - Async HTTP communication via `reqwest`
//! - Configurable endpoint, model, API key and temperature
//! - Request timeout
//! - HTTP status mapped onto structured [`LlmError`] variants
//!
//! The provider never retries. A failed call is reported
//! once, with a [`FailureClass`](quill_domain::FailureClass) the caller's
//! retry policy can act on.
//!
//! # Examples
//!
//! ```no_run
//! use quill_llm::GroqProvider;
//! use quill_domain::CompletionProvider;
//!
//! let provider = GroqProvider::new(
//!     "https://api.groq.com/openai/v1",
//!     "llama3-70b-8192",
//!     "gsk_...",
//! )?;
//! let text = provider.complete("Say hello")?;
//! # Ok::<(), quill_llm::LlmError>(())
//! ```

use crate::LlmError;
use quill_domain::CompletionProvider;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::debug;

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";

/// Default timeout for completion requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Chat-completions provider
///
/// Owns a single-threaded tokio runtime so it can serve the synchronous
/// [`CompletionProvider`] contract. Do not call [`CompletionProvider::complete`]
/// from inside another tokio runtime; use [`GroqProvider::generate`] there.
pub struct GroqProvider {
    endpoint: String,
    model: String,
    api_key: String,
    temperature: Option<f32>,
    client: reqwest::Client,
    runtime: Runtime,
}

/// Request body for the chat-completions API
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response from the chat-completions API
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl GroqProvider {
    /// Create a new provider with the default timeout
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL (e.g., "https://api.groq.com/openai/v1")
    /// - `model`: Model to use (e.g., "llama3-70b-8192")
    /// - `api_key`: Bearer token sent with every request
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        Self::with_timeout(
            endpoint,
            model,
            api_key,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Create a new provider with an explicit request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            temperature: None,
            client,
            runtime,
        })
    }

    /// Create a provider against the default endpoint and model
    pub fn default_endpoint(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_MODEL, api_key)
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Generate text for a prompt
    ///
    /// # Errors
    ///
    /// - [`LlmError::ServiceUnavailable`] for 5xx gateway errors, timeouts and
    ///   refused connections
    /// - [`LlmError::Authentication`] for 401/403
    /// - [`LlmError::ModelNotAvailable`] for 404
    /// - [`LlmError::ContextTooBig`] when the prompt does not fit
    /// - [`LlmError::RateLimitExceeded`] for 429
    /// - [`LlmError::InvalidResponse`] when the body cannot be decoded
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.endpoint);

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        debug!("POST {} (model {}, prompt {} chars)", url, self.model, prompt.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(status_error(status, &body, &self.model));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("Response contained no choices".to_string()))
    }
}

impl CompletionProvider for GroqProvider {
    type Error = LlmError;

    fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        self.runtime.block_on(self.generate(prompt))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn request_error(error: reqwest::Error) -> LlmError {
    if error.is_timeout() || error.is_connect() {
        LlmError::ServiceUnavailable(format!("Request failed: {}", error))
    } else {
        LlmError::Communication(format!("Request failed: {}", error))
    }
}

/// Map a non-success HTTP status onto an error variant
fn status_error(status: StatusCode, body: &str, model: &str) -> LlmError {
    let detail = format!("HTTP {}: {}", status, body);
    let lowered = body.to_lowercase();
    match status {
        StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => LlmError::ServiceUnavailable(detail),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Authentication(detail),
        StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        StatusCode::PAYLOAD_TOO_LARGE => LlmError::ContextTooBig(detail),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
        StatusCode::BAD_REQUEST
            if lowered.contains("context") || lowered.contains("too long") =>
        {
            LlmError::ContextTooBig(detail)
        }
        _ => LlmError::Communication(detail),
    }
}
