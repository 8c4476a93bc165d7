//! Error types for tooltrack
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in tooltrack
#[derive(Debug, Error)]
pub enum ToolTrackError {
    /// Tool not found in the store
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// A record failed field validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Storage/persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Remote tool API error
    #[error("Remote error {status}: {message}")]
    Remote { status: u16, message: String },

    /// Natural-language intake failed; displays the localized message
    #[error(transparent)]
    Intake(#[from] crate::intake::IntakeError),

    /// Missing or inconsistent configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport error talking to the remote store
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for tooltrack operations
pub type Result<T> = std::result::Result<T, ToolTrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_not_found_error() {
        let err = ToolTrackError::ToolNotFound("tool-1".to_string());
        assert_eq!(err.to_string(), "Tool not found: tool-1");
    }

    #[test]
    fn test_validation_error() {
        let err = ToolTrackError::Validation("name must not be empty".to_string());
        assert_eq!(err.to_string(), "Validation failed: name must not be empty");
    }

    #[test]
    fn test_storage_error() {
        let err = ToolTrackError::Storage("disk full".to_string());
        assert_eq!(err.to_string(), "Storage error: disk full");
    }

    #[test]
    fn test_remote_error() {
        let err = ToolTrackError::Remote {
            status: 500,
            message: "table missing".to_string(),
        };
        assert_eq!(err.to_string(), "Remote error 500: table missing");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ToolTrackError = io_err.into();
        assert!(matches!(err, ToolTrackError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: ToolTrackError = json_err.into();
        assert!(matches!(err, ToolTrackError::Json(_)));
    }
}
