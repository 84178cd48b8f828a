//! Data types for batch processing.

use crate::batch::error::BatchError;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of a batch, one entry per input item in input order.
#[derive(Debug, Clone)]
pub struct BatchResult<R> {
    pub outcomes: Vec<Result<R, BatchError>>,
    /// Total duration of batch processing.
    pub total_duration: Duration,
}

impl<R> BatchResult<R> {
    pub fn new(outcomes: Vec<Result<R, BatchError>>, total_duration: Duration) -> Self {
        Self {
            outcomes,
            total_duration,
        }
    }

    /// Get total number of items processed.
    pub fn total_items(&self) -> usize {
        self.outcomes.len()
    }

    pub fn successful(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.total_items() - self.successful()
    }

    pub fn into_outcomes(self) -> Vec<Result<R, BatchError>> {
        self.outcomes
    }
}

/// Snapshot passed to the progress callback each time an item finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// Index of the item that just finished.
    pub index: usize,
    pub completed: usize,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

/// Progress callback function type.
pub type ProgressCallback = Arc<dyn Fn(BatchProgress) + Send + Sync>;
