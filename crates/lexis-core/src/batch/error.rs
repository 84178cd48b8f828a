//! Error types for batch processing.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during batch processing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// The processor returned an error for one item.
    #[error("Item {index} failed: {message}")]
    Item {
        /// Position of the item in the input.
        index: usize,
        /// Error message from the processor.
        message: String,
    },

    /// The item did not finish within the per-item timeout.
    #[error("Item {index} timed out after {after:?}")]
    Timeout { index: usize, after: Duration },

    /// The task running the item panicked or was aborted.
    #[error("Item {index} aborted: {message}")]
    Aborted { index: usize, message: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = BatchError::Item {
            index: 3,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Item 3 failed: boom");

        let err = BatchError::Timeout {
            index: 1,
            after: Duration::from_secs(2),
        };
        assert_eq!(err.to_string(), "Item 1 timed out after 2s");
    }
}
