//! Natural-language tool intake
//!
//! Turns free text such as "log new hammer drill inv #H78-B, assign to Dave
//! at the North Site" into validated `ToolData` by asking the model for a
//! schema-constrained JSON object.

use std::sync::Arc;

use thiserror::Error;

use super::schema::tool_response_schema;
use crate::domain::{MissingField, ToolData, ToolDraft};
use crate::i18n::Language;
use crate::llm::{LlmClient, LlmError, StructuredRequest};

/// Underlying reason an intake attempt failed
#[derive(Debug, Error)]
pub enum IntakeFailure {
    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("model client {0} is not ready")]
    NotReady(String),

    #[error("model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("model output is not a tool object: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Incomplete(#[from] MissingField),
}

/// User-facing intake error
///
/// Displays as the single localized message; the cause is kept as the
/// error source for logs.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct IntakeError {
    pub message: &'static str,
    #[source]
    pub cause: IntakeFailure,
}

impl IntakeError {
    fn new(language: Language, cause: IntakeFailure) -> Self {
        Self {
            message: language.strings().intake_error,
            cause,
        }
    }
}

/// Converts free text into a tool payload via an LLM
#[derive(Clone)]
pub struct IntakeParser {
    client: Arc<dyn LlmClient>,
}

impl IntakeParser {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Build the model request for `prompt` in `language`
    pub fn build_request(prompt: &str, language: Language) -> StructuredRequest {
        StructuredRequest::new(
            language.strings().intake_system_instruction,
            format!("Parse the following user request into a tool object: \"{}\"", prompt),
            tool_response_schema(),
        )
    }

    /// Parse `prompt` into validated tool data
    ///
    /// Makes exactly one model call. Any failure maps to the localized
    /// intake error for `language`.
    pub async fn parse(&self, prompt: &str, language: Language) -> Result<ToolData, IntakeError> {
        self.try_parse(prompt, language).await.map_err(|cause| {
            log::error!("Error parsing tool from prompt: {}", cause);
            IntakeError::new(language, cause)
        })
    }

    async fn try_parse(&self, prompt: &str, language: Language) -> Result<ToolData, IntakeFailure> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(IntakeFailure::EmptyPrompt);
        }
        if !self.client.is_ready() {
            return Err(IntakeFailure::NotReady(self.client.model().to_string()));
        }

        let request = Self::build_request(prompt, language);
        let text = self.client.generate_json(&request).await?;
        let draft: ToolDraft = serde_json::from_str(text.trim())?;
        let data = draft.validate()?;

        log::info!("Parsed tool '{}' ({}) from prompt", data.name, data.inventory_code);
        Ok(data)
    }
}

impl std::fmt::Debug for IntakeParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntakeParser")
            .field("model", &self.client.model())
            .finish()
    }
}
