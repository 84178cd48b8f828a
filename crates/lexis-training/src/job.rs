use chrono::{DateTime, Utc};
use lexis_abstraction::{FineTuningJob, FineTuningStatus};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Number of trailing job-id characters used for a freshly submitted job's label.
pub const JOB_LABEL_LEN: usize = 4;

/// Number of trailing model-id characters used for a trained model's label.
pub const MODEL_LABEL_LEN: usize = 5;

/// Identifier for a remote fine-tuning job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrainingJobId(pub String);

impl TrainingJobId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrainingJobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle of a training job as seen by this application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl JobStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    fn rank(self) -> u8 {
        match self {
            Self::Queued => 0,
            Self::Running => 1,
            Self::Succeeded | Self::Failed => 2,
        }
    }
}

impl From<FineTuningStatus> for JobStatus {
    fn from(status: FineTuningStatus) -> Self {
        match status {
            FineTuningStatus::ValidatingFiles
            | FineTuningStatus::Queued
            | FineTuningStatus::Unknown => Self::Queued,
            FineTuningStatus::Running => Self::Running,
            FineTuningStatus::Succeeded => Self::Succeeded,
            // A cancelled job will never produce a model.
            FineTuningStatus::Failed | FineTuningStatus::Cancelled => Self::Failed,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Local view of a submitted fine-tuning job.
///
/// Only moves forward: `Queued`/`Running` to `Succeeded`/`Failed`. Updates that
/// would move it back, or arrive after a terminal state, are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingJobHandle {
    pub job_id: TrainingJobId,
    pub status: JobStatus,
    /// Last status string reported by the remote service.
    pub remote_status: FineTuningStatus,
    pub result_model_id: Option<String>,
    pub version_label: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TrainingJobHandle {
    /// Handle for a job that was just created. Always starts `Queued`.
    #[must_use]
    pub fn submitted(job: &FineTuningJob) -> Self {
        Self {
            job_id: TrainingJobId(job.id.clone()),
            status: JobStatus::Queued,
            remote_status: job.status,
            result_model_id: job.fine_tuned_model.clone(),
            version_label: Some(job_version_label(&job.id)),
            created_at: timestamp_from_epoch(job.created_at),
        }
    }

    /// Handle reflecting a job record fetched on its own (no prior local state).
    #[must_use]
    pub fn from_job(job: &FineTuningJob) -> Self {
        let status = JobStatus::from(job.status);
        let result_model_id = if status == JobStatus::Succeeded {
            non_empty(job.fine_tuned_model.as_deref())
        } else {
            None
        };
        Self {
            job_id: TrainingJobId(job.id.clone()),
            status,
            remote_status: job.status,
            version_label: result_model_id.as_deref().map(model_version_label),
            result_model_id,
            created_at: timestamp_from_epoch(job.created_at),
        }
    }

    /// Applies a freshly fetched record. Returns `true` if the handle changed status.
    pub fn apply(&mut self, job: &FineTuningJob) -> bool {
        if job.id != self.job_id.0 {
            warn!(
                job_id = %self.job_id,
                other = %job.id,
                "Ignoring status for a different job"
            );
            return false;
        }

        let next = JobStatus::from(job.status);
        if self.status.is_terminal() {
            if next != self.status {
                warn!(
                    job_id = %self.job_id,
                    current = %self.status,
                    reported = %next,
                    "Ignoring update after terminal state"
                );
            }
            return false;
        }
        if next.rank() < self.status.rank() {
            warn!(
                job_id = %self.job_id,
                current = %self.status,
                reported = %next,
                "Ignoring status regression"
            );
            return false;
        }

        self.remote_status = job.status;
        let changed = next != self.status;
        self.status = next;

        match next {
            JobStatus::Succeeded => {
                self.result_model_id = non_empty(job.fine_tuned_model.as_deref());
                if let Some(model) = &self.result_model_id {
                    self.version_label = Some(model_version_label(model));
                }
            }
            JobStatus::Failed => self.result_model_id = None,
            JobStatus::Queued | JobStatus::Running => {}
        }
        changed
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

fn trailing_chars(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    if count <= n {
        return s;
    }
    s.char_indices().nth(count - n).map_or(s, |(idx, _)| &s[idx..])
}

/// Short label for a submitted job: trailing characters of the job id, upper-cased.
///
/// `"ftjob-ABC123XYZ9"` gives `"XYZ9"`.
pub fn job_version_label(job_id: &str) -> String {
    trailing_chars(job_id, JOB_LABEL_LEN).to_uppercase()
}

/// Short label for a trained model: trailing characters of the last `:` segment.
///
/// `"ft:gpt-4o-mini-2024-07-18:acme::AbCdEfGh"` gives `"dEfGh"`.
pub fn model_version_label(model_id: &str) -> String {
    let segment = model_id.rsplit(':').next().unwrap_or(model_id);
    trailing_chars(segment, MODEL_LABEL_LEN).to_string()
}

pub fn timestamp_from_epoch(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

/// Renders a timestamp as `M/D/YYYY, h:mm:ss AM` (UTC).
pub fn render_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: &str, status: FineTuningStatus, model: Option<&str>) -> FineTuningJob {
        FineTuningJob {
            id: id.to_string(),
            status,
            fine_tuned_model: model.map(str::to_string),
            created_at: 1_721_764_800,
        }
    }

    #[test]
    fn test_job_version_label() {
        assert_eq!(job_version_label("ftjob-ABC123XYZ9"), "XYZ9");
        assert_eq!(job_version_label("ftjob-abc123xyz9"), "XYZ9");
        assert_eq!(job_version_label("ab"), "AB");
    }

    #[test]
    fn test_model_version_label() {
        assert_eq!(model_version_label("ft:gpt-4o-mini-2024-07-18:acme::9xK2q"), "9xK2q");
        assert_eq!(model_version_label("ft:gpt-4o-mini-2024-07-18:acme::AbCdEfGh"), "dEfGh");
        assert_eq!(model_version_label("abc"), "abc");
        assert_eq!(model_version_label("ft:gpt-4o-mini:acme:"), "");
    }

    #[test]
    fn test_render_timestamp() {
        let ts = timestamp_from_epoch(1_721_764_800);
        assert_eq!(render_timestamp(&ts), "7/23/2024, 8:00:00 PM");
    }

    #[test]
    fn test_submitted_handle_starts_queued() {
        let handle = TrainingJobHandle::submitted(&job(
            "ftjob-ABC123XYZ9",
            FineTuningStatus::ValidatingFiles,
            None,
        ));
        assert_eq!(handle.status, JobStatus::Queued);
        assert_eq!(handle.version_label.as_deref(), Some("XYZ9"));
        assert!(handle.result_model_id.is_none());
    }

    #[test]
    fn test_apply_moves_forward_to_success() {
        let mut handle =
            TrainingJobHandle::submitted(&job("ftjob-1", FineTuningStatus::Queued, None));
        assert!(handle.apply(&job("ftjob-1", FineTuningStatus::Running, None)));
        assert_eq!(handle.status, JobStatus::Running);

        assert!(handle.apply(&job(
            "ftjob-1",
            FineTuningStatus::Succeeded,
            Some("ft:gpt-4o-mini:acme::zq81k"),
        )));
        assert_eq!(handle.status, JobStatus::Succeeded);
        assert_eq!(handle.result_model_id.as_deref(), Some("ft:gpt-4o-mini:acme::zq81k"));
        assert_eq!(handle.version_label.as_deref(), Some("zq81k"));
    }

    #[test]
    fn test_apply_ignores_regression_and_post_terminal_updates() {
        let mut handle =
            TrainingJobHandle::submitted(&job("ftjob-1", FineTuningStatus::Queued, None));
        handle.apply(&job("ftjob-1", FineTuningStatus::Running, None));
        assert!(!handle.apply(&job("ftjob-1", FineTuningStatus::Queued, None)));
        assert_eq!(handle.status, JobStatus::Running);

        handle.apply(&job("ftjob-1", FineTuningStatus::Failed, None));
        assert_eq!(handle.status, JobStatus::Failed);
        assert!(!handle.apply(&job("ftjob-1", FineTuningStatus::Succeeded, Some("ft:x::abcde"))));
        assert_eq!(handle.status, JobStatus::Failed);
        assert!(handle.result_model_id.is_none());
    }

    #[test]
    fn test_cancelled_is_terminal_failure() {
        let handle =
            TrainingJobHandle::from_job(&job("ftjob-1", FineTuningStatus::Cancelled, None));
        assert_eq!(handle.status, JobStatus::Failed);
        assert!(handle.is_terminal());
        assert_eq!(handle.remote_status, FineTuningStatus::Cancelled);
    }

    #[test]
    fn test_from_job_without_model_has_no_label() {
        let handle = TrainingJobHandle::from_job(&job("ftjob-1", FineTuningStatus::Running, None));
        assert_eq!(handle.status, JobStatus::Running);
        assert!(handle.version_label.is_none());
    }
}
