//! LLM Client Layer - structured-output calls to a generative model
//!
//! This module provides:
//! - LlmClient trait for API abstraction
//! - GeminiClient implementation
//! - MockLlmClient for tests

pub mod client;
pub mod gemini;

pub use client::{LlmClient, LlmError, MockLlmClient, StructuredRequest};
pub use gemini::{GeminiClient, GeminiConfig};
