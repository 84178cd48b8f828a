//! Fine-tuning contract: dataset upload and job management.

use crate::ModelError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Job status as reported by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FineTuningStatus {
    ValidatingFiles,
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
    /// Any status string this client does not know about.
    #[serde(other)]
    Unknown,
}

impl FineTuningStatus {
    /// The wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidatingFiles => "validating_files",
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FineTuningStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fine-tuning job record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FineTuningJob {
    /// Job identifier assigned by the service (e.g. `ftjob-abc123`).
    pub id: String,
    /// Current job status.
    pub status: FineTuningStatus,
    /// Resulting model identifier; only present once the job has succeeded.
    #[serde(default)]
    pub fine_tuned_model: Option<String>,
    /// Creation time in epoch seconds.
    pub created_at: i64,
}

/// A dataset file stored by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: String,
}

/// Operations for submitting and tracking fine-tuning jobs.
#[async_trait]
pub trait FineTuningService: Send + Sync {
    /// Uploads a dataset file and returns its remote handle.
    async fn upload_dataset(
        &self,
        file_name: &str,
        content: Vec<u8>,
        purpose: &str,
    ) -> Result<UploadedFile, ModelError>;

    /// Starts a fine-tuning job for `base_model` using an uploaded training file.
    async fn create_fine_tuning_job(
        &self,
        training_file_id: &str,
        base_model: &str,
    ) -> Result<FineTuningJob, ModelError>;

    /// Fetches the current state of a job.
    async fn get_fine_tuning_job(&self, job_id: &str) -> Result<FineTuningJob, ModelError>;

    /// Lists the most recent jobs, newest first as returned by the service.
    async fn list_fine_tuning_jobs(&self, limit: u32) -> Result<Vec<FineTuningJob>, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_deserialization() {
        let status: FineTuningStatus = serde_json::from_str(r#""validating_files""#).unwrap();
        assert_eq!(status, FineTuningStatus::ValidatingFiles);

        let status: FineTuningStatus = serde_json::from_str(r#""succeeded""#).unwrap();
        assert_eq!(status, FineTuningStatus::Succeeded);

        let status: FineTuningStatus = serde_json::from_str(r#""paused""#).unwrap();
        assert_eq!(status, FineTuningStatus::Unknown);
    }

    #[test]
    fn test_job_deserialization_with_null_model() {
        let json = r#"{
            "object": "fine_tuning.job",
            "id": "ftjob-abc123",
            "status": "running",
            "fine_tuned_model": null,
            "created_at": 1721764800
        }"#;
        let job: FineTuningJob = serde_json::from_str(json).unwrap();
        assert_eq!(job.id, "ftjob-abc123");
        assert_eq!(job.status, FineTuningStatus::Running);
        assert!(job.fine_tuned_model.is_none());
        assert_eq!(job.created_at, 1_721_764_800);
    }

    #[test]
    fn test_status_display_matches_wire_name() {
        assert_eq!(FineTuningStatus::Cancelled.to_string(), "cancelled");
        assert_eq!(FineTuningStatus::ValidatingFiles.to_string(), "validating_files");
    }
}
