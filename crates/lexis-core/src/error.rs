//! Error types for Lexis Core.

use lexis_abstraction::ModelError;
use lexis_training::TrainingError;
use thiserror::Error;

/// Core error type for Lexis operations.
#[derive(Error, Debug)]
pub enum LexisError {
    /// Missing or empty required input, rejected before any remote call.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The input table could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A call to the remote service failed.
    #[error("Remote service error: {0}")]
    Remote(#[from] ModelError),

    /// Training submission or status errors
    #[error("Training error: {0}")]
    Training(#[from] TrainingError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for LexisError {
    fn from(err: csv::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<::config::ConfigError> for LexisError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for Lexis operations.
pub type Result<T> = std::result::Result<T, LexisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_conversion() {
        let err: LexisError = ModelError::RequestError("timeout".to_string()).into();
        match err {
            LexisError::Remote(ModelError::RequestError(msg)) => assert_eq!(msg, "timeout"),
            _ => panic!("Expected Remote error variant"),
        }
    }

    #[test]
    fn test_training_error_conversion() {
        let err: LexisError = TrainingError::InvalidArgument("empty".to_string()).into();
        assert!(matches!(
            err,
            LexisError::Training(TrainingError::InvalidArgument(_))
        ));
        assert_eq!(err.to_string(), "Training error: invalid argument: empty");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: LexisError = io_err.into();
        assert!(matches!(err, LexisError::Io(_)));
    }
}
