//! Gemini API client implementation
//!
//! This module implements the LlmClient trait for Google's Generative
//! Language API using its JSON-schema constrained output mode.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::llm::client::{LlmClient, LlmError, StructuredRequest};

/// Gemini API base URL
pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model to use
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Configuration for the Gemini client
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub model: String,
    pub base_url: String,
    pub api_key_env: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_API_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    api_key: String,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new Gemini client, reading the key from `config.api_key_env`
    pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| LlmError::MissingApiKey {
            env_var: config.api_key_env.clone(),
        })?;

        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(api_key: String, config: GeminiConfig) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Build the request body for the generateContent call
    fn build_request(&self, request: &StructuredRequest) -> Value {
        let mut body = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": request.prompt }]
                }
            ],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": request.response_schema
            }
        });

        if !request.system_instruction.is_empty() {
            body["systemInstruction"] = json!({
                "parts": [{ "text": request.system_instruction }]
            });
        }

        body
    }

    /// Pull the generated text out of the first candidate
    fn parse_response(&self, body: &Value) -> Result<String, LlmError> {
        let candidate = body["candidates"]
            .get(0)
            .ok_or_else(|| LlmError::InvalidResponse("response has no candidates".to_string()))?;

        let parts = candidate["content"]["parts"].as_array().ok_or_else(|| {
            let reason = candidate["finishReason"].as_str().unwrap_or("unknown");
            LlmError::InvalidResponse(format!("candidate has no content (finish reason: {})", reason))
        })?;

        let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
        let text = text.trim();
        if text.is_empty() {
            return Err(LlmError::InvalidResponse("candidate text is empty".to_string()));
        }

        Ok(text.to_string())
    }

    /// Send a request to the Gemini API
    async fn send_request(&self, body: Value) -> Result<Value, LlmError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        // Intake never retries, so the Retry-After hint is not kept
        if status.as_u16() == 429 {
            return Err(LlmError::RateLimited);
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate_json(&self, request: &StructuredRequest) -> Result<String, LlmError> {
        log::debug!("Sending structured request to {}", self.config.model);
        let body = self.build_request(request);
        let response = self.send_request(body).await?;
        self.parse_response(&response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn is_ready(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeminiClient {
        GeminiClient::with_api_key("test-key".to_string(), GeminiConfig::default()).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = GeminiConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_key_env, DEFAULT_API_KEY_ENV);
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    /// Client pointed at a local stand-in for the API answering every call with `status` and `body`
    async fn local_client(status: u16, body: Value) -> GeminiClient {
        use axum::{Json, Router, http::StatusCode, routing::post};

        let app = Router::new().route(
            "/v1beta/models/{*rest}",
            post(move || async move { (StatusCode::from_u16(status).unwrap(), Json(body)) }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });

        let config = GeminiConfig {
            base_url: format!("http://{}/v1beta", addr),
            ..Default::default()
        };
        GeminiClient::with_api_key("test-key".to_string(), config).unwrap()
    }

    #[tokio::test]
    async fn test_generate_json_over_http() {
        let body = json!({ "candidates": [{ "content": { "parts": [{ "text": "{\"name\":\"Drill\"}" }] } }] });
        let client = local_client(200, body).await;
        let request = StructuredRequest::new("sys", "log a drill", json!({}));
        assert_eq!(client.generate_json(&request).await.unwrap(), r#"{"name":"Drill"}"#);
    }

    #[tokio::test]
    async fn test_generate_json_rate_limited() {
        let client = local_client(429, json!({ "error": { "message": "quota" } })).await;
        let request = StructuredRequest::new("sys", "log a drill", json!({}));
        assert!(matches!(client.generate_json(&request).await, Err(LlmError::RateLimited)));
    }

    #[tokio::test]
    async fn test_generate_json_api_error() {
        let client = local_client(500, json!({ "error": { "message": "boom" } })).await;
        let request = StructuredRequest::new("sys", "log a drill", json!({}));
        let err = client.generate_json(&request).await.unwrap_err();
        assert!(matches!(err, LlmError::ApiError { status: 500, ref message } if message.contains("boom")));
    }

    #[test]
    fn test_client_without_api_key() {
        let config = GeminiConfig {
            api_key_env: "TOOLTRACK_TEST_UNSET_GEMINI_KEY".to_string(),
            ..Default::default()
        };
        let result = GeminiClient::new(config);
        assert!(matches!(result, Err(LlmError::MissingApiKey { .. })));
    }

    #[test]
    fn test_endpoint() {
        let config = GeminiConfig {
            base_url: "http://localhost:9000/v1beta/".to_string(),
            ..Default::default()
        };
        let client = GeminiClient::with_api_key("k".to_string(), config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_build_request() {
        let schema = json!({"type": "OBJECT", "required": ["name"]});
        let request = StructuredRequest::new("be helpful", "log a drill", schema.clone());

        let body = client().build_request(&request);

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "log a drill");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be helpful");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"], schema);
    }

    #[test]
    fn test_build_request_without_system_instruction() {
        let request = StructuredRequest::new("", "log a drill", json!({}));
        let body = client().build_request(&request);
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let body = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": " {\"name\":" }, { "text": "\"Drill\"} \n" }]
                },
                "finishReason": "STOP"
            }]
        });

        let text = client().parse_response(&body).unwrap();
        assert_eq!(text, "{\"name\":\"Drill\"}");
    }

    #[test]
    fn test_parse_response_no_candidates() {
        let result = client().parse_response(&json!({ "candidates": [] }));
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_response_blocked_candidate() {
        let body = json!({ "candidates": [{ "finishReason": "SAFETY" }] });
        let err = client().parse_response(&body).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_debug_impl_hides_key() {
        let debug_str = format!("{:?}", client());
        assert!(debug_str.contains("GeminiClient"));
        assert!(debug_str.contains(DEFAULT_MODEL));
        assert!(!debug_str.contains("test-key"));
    }

    #[test]
    fn test_empty_api_key_not_ready() {
        let client = GeminiClient::with_api_key(String::new(), GeminiConfig::default()).unwrap();
        assert!(!client.is_ready());
        assert_eq!(client.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GeminiClient>();
    }
}
