use lexis_abstraction::ModelError;
use thiserror::Error;

pub type TrainingResult<T> = std::result::Result<T, TrainingError>;

#[derive(Debug, Error)]
pub enum TrainingError {
    /// Missing or empty input, rejected before any remote call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("dataset error: {0}")]
    Dataset(String),

    /// Dataset upload or job creation was rejected by the remote service.
    #[error("training submission failed: {0}")]
    Submission(ModelError),

    /// A status or listing query failed.
    #[error("remote service error: {0}")]
    Remote(ModelError),

    #[error("polling cancelled for job {0}")]
    Cancelled(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
