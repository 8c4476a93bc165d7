//! Tooltrack - construction-site tool inventory
//!
//! Tracks tools through a three-state lifecycle (In Stock, Issued, In Repair)
//! with a local or remote store, a natural-language intake backed by Gemini,
//! and an optional REST back end.

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod id;
pub mod intake;
pub mod lifecycle;
pub mod llm;
pub mod server;
pub mod storage;

pub use error::{Result, ToolTrackError};
