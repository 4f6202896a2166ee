//! Error types for uncms library.
//!
//! Only the input boundary (reading and decoding documents) and option
//! validation can fail. Rendering itself degrades instead of erroring.

use std::io;
use thiserror::Error;

/// Result type alias for uncms operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading documents or configuring rendering.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON value does not describe a document.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Render options are inconsistent or out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidDocument("expected an object".to_string());
        assert_eq!(err.to_string(), "Invalid document: expected an object");

        let err = Error::InvalidConfig("max_depth must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: max_depth must be at least 1"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
