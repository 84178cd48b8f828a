//! Lexis Training
//!
//! Fine-tuning primitives for corrected translation pairs:
//! - Building chat-format JSONL datasets (`TrainingExample`)
//! - Submitting fine-tuning jobs (`TrainingOrchestrator`)
//! - Polling jobs to a terminal state (`JobPoller`)
//! - Listing trained models (`list_completed_models`)

pub mod dataset;
pub mod error;
pub mod job;
pub mod poller;
pub mod progress;
pub mod registry;
pub mod submit;

#[cfg(test)]
pub(crate) mod testing;

pub use dataset::{ChatRecord, TrainingExample, build_jsonl, validate_examples};
pub use error::{TrainingError, TrainingResult};
pub use job::{
    JobStatus, TrainingJobHandle, TrainingJobId, job_version_label, model_version_label,
    render_timestamp,
};
pub use poller::{DEFAULT_POLL_INTERVAL, JobPoller};
pub use progress::{ProgressEvent, ProgressSink, StdoutProgressSink, TracingProgressSink};
pub use registry::{
    DEFAULT_LIST_LIMIT, ModelDescriptor, ModelOrdering, completed_models, list_completed_models,
};
pub use submit::{DEFAULT_BASE_MODEL, FINE_TUNE_PURPOSE, TrainingOrchestrator};
