//! Bounded-concurrency batch processing of async operations.

pub mod error;
pub mod processor;
pub mod types;

pub use error::BatchError;
pub use processor::{BatchProcessor, DEFAULT_CONCURRENCY};
pub use types::{BatchProgress, BatchResult, ProgressCallback};
