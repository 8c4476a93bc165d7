//! Core LLM client types and trait definitions

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

/// Stateless LLM client - each call is independent (fresh context)
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Ask the model for a JSON document conforming to `request.response_schema`.
    /// Returns the raw JSON text; callers decide how to parse it.
    async fn generate_json(&self, request: &StructuredRequest) -> Result<String, LlmError>;

    /// Model identifier used for requests
    fn model(&self) -> &str;

    /// Whether the client has what it needs to make calls
    fn is_ready(&self) -> bool;
}

/// A structured-output request - everything needed for one LLM call
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    /// System instruction (language-specific)
    pub system_instruction: String,

    /// User content
    pub prompt: String,

    /// JSON schema the response must follow
    pub response_schema: Value,
}

impl StructuredRequest {
    pub fn new(system_instruction: impl Into<String>, prompt: impl Into<String>, response_schema: Value) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            prompt: prompt.into(),
            response_schema,
        }
    }
}

/// Errors that can occur during LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Rate limited by the model API")]
    RateLimited,

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Missing API key: environment variable {env_var} not set")]
    MissingApiKey { env_var: String },
}

/// Canned-response client for tests and offline runs
///
/// Records every request it receives so tests can inspect what was sent.
/// Clones share the record.
#[derive(Debug, Clone)]
pub struct MockLlmClient {
    response: MockResponse,
    requests: Arc<Mutex<Vec<StructuredRequest>>>,
}

#[derive(Debug, Clone)]
enum MockResponse {
    Text(String),
    ApiFailure { status: u16, message: String },
}

impl MockLlmClient {
    /// Always answer with `response`
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: MockResponse::Text(response.into()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always fail with an API error
    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        Self {
            response: MockResponse::ApiFailure {
                status,
                message: message.into(),
            },
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Requests seen so far
    pub fn requests(&self) -> Vec<StructuredRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate_json(&self, request: &StructuredRequest) -> Result<String, LlmError> {
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request.clone());
        }
        match &self.response {
            MockResponse::Text(text) => Ok(text.clone()),
            MockResponse::ApiFailure { status, message } => Err(LlmError::ApiError {
                status: *status,
                message: message.clone(),
            }),
        }
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn is_ready(&self) -> bool {
        true
    }
}
