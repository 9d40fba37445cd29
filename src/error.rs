//! Error types for playgen
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur while building a playlist
#[derive(Debug, Error)]
pub enum PlaygenError {
    /// Invalid or inconsistent configuration value
    #[error("Config error: {0}")]
    Config(String),

    /// Media directory could not be scanned
    #[error("Scan error: {0}")]
    Scan(String),

    /// Duration probe failed for a clip
    #[error("Probe error: {0}")]
    Probe(String),

    /// Playback state could not be persisted
    #[error("State error: {0}")]
    State(String),

    /// Template program could not be loaded
    #[error("Template error: {0}")]
    Template(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for playgen operations
pub type Result<T> = std::result::Result<T, PlaygenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = PlaygenError::Config("bad slot time 25:00".to_string());
        assert_eq!(err.to_string(), "Config error: bad slot time 25:00");
    }

    #[test]
    fn test_probe_error() {
        let err = PlaygenError::Probe("timed out".to_string());
        assert_eq!(err.to_string(), "Probe error: timed out");
    }

    #[test]
    fn test_state_error() {
        let err = PlaygenError::State("rename failed".to_string());
        assert_eq!(err.to_string(), "State error: rename failed");
    }

    #[test]
    fn test_template_error() {
        let err = PlaygenError::Template("no program field".to_string());
        assert_eq!(err.to_string(), "Template error: no program field");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PlaygenError = io_err.into();
        assert!(matches!(err, PlaygenError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: PlaygenError = json_err.into();
        assert!(matches!(err, PlaygenError::Json(_)));
    }
}
