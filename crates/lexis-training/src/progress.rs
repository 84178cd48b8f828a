use crate::job::{JobStatus, TrainingJobHandle, TrainingJobId};
use lexis_abstraction::FineTuningStatus;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    Submitted {
        job_id: TrainingJobId,
        version: Option<String>,
    },
    Polled {
        job_id: TrainingJobId,
        poll: u32,
        status: FineTuningStatus,
    },
    Finished {
        job_id: TrainingJobId,
        status: JobStatus,
        model: Option<String>,
    },
}

impl ProgressEvent {
    pub fn submitted(handle: &TrainingJobHandle) -> Self {
        Self::Submitted {
            job_id: handle.job_id.clone(),
            version: handle.version_label.clone(),
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn on_event(&self, event: ProgressEvent);
}

#[derive(Debug, Default)]
pub struct StdoutProgressSink;

impl ProgressSink for StdoutProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Submitted {
                job_id,
                version: Some(version),
            } => {
                println!("[train:{job_id}] submitted as v{version}");
            }
            ProgressEvent::Submitted {
                job_id,
                version: None,
            } => {
                println!("[train:{job_id}] submitted");
            }
            ProgressEvent::Polled {
                job_id,
                poll,
                status,
            } => {
                println!("[train:{job_id}] poll {poll}: {status}");
            }
            ProgressEvent::Finished {
                job_id,
                status,
                model: Some(model),
            } => {
                println!("[train:{job_id}] {status}: {model}");
            }
            ProgressEvent::Finished {
                job_id,
                status,
                model: None,
            } => {
                println!("[train:{job_id}] {status}");
            }
        }
    }
}

/// Reports progress through `tracing` instead of stdout.
#[derive(Debug, Default)]
pub struct TracingProgressSink;

impl ProgressSink for TracingProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Submitted { job_id, version } => {
                info!(job_id = %job_id, version = ?version, "Training job submitted");
            }
            ProgressEvent::Polled {
                job_id,
                poll,
                status,
            } => {
                info!(job_id = %job_id, poll = poll, status = %status, "Polled training job");
            }
            ProgressEvent::Finished {
                job_id,
                status,
                model,
            } => {
                info!(job_id = %job_id, status = %status, model = ?model, "Training job finished");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::job;

    #[test]
    fn test_submitted_event_carries_job_label() {
        let job = job("ftjob-ABC123XYZ9", FineTuningStatus::Queued, None, 1);
        let handle = TrainingJobHandle::submitted(&job);
        let event = ProgressEvent::submitted(&handle);
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({
                "type": "submitted",
                "job_id": "ftjob-ABC123XYZ9",
                "version": "XYZ9"
            })
        );
    }
}
