//! Fixed-interval status polling for fine-tuning jobs.

use crate::error::{TrainingError, TrainingResult};
use crate::job::TrainingJobHandle;
use crate::progress::{ProgressEvent, ProgressSink};
use lexis_abstraction::FineTuningService;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Queries job status until the job reaches a terminal state.
#[derive(Clone)]
pub struct JobPoller {
    service: Arc<dyn FineTuningService>,
    interval: Duration,
}

impl JobPoller {
    pub fn new(service: Arc<dyn FineTuningService>) -> Self {
        Self {
            service,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Single status query for a job this process has no local handle for.
    pub async fn fetch_status(&self, job_id: &str) -> TrainingResult<TrainingJobHandle> {
        if job_id.trim().is_empty() {
            return Err(TrainingError::InvalidArgument(
                "job id is required".to_string(),
            ));
        }
        let job = self.service.get_fine_tuning_job(job_id).await.map_err(|e| {
            error!(job_id = %job_id, error = %e, "Failed to fetch training status");
            TrainingError::Remote(e)
        })?;
        Ok(TrainingJobHandle::from_job(&job))
    }

    /// Sleeps for the interval, queries, and repeats until `handle` is terminal.
    ///
    /// A failed query ends the loop with `Remote`. Cancelling `cancel` stops the
    /// loop at the next suspension point, including mid-query, and returns
    /// `Cancelled`.
    pub async fn poll_until_terminal(
        &self,
        mut handle: TrainingJobHandle,
        cancel: &CancellationToken,
        progress: &dyn ProgressSink,
    ) -> TrainingResult<TrainingJobHandle> {
        let mut poll = 0u32;

        while !handle.is_terminal() {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!(job_id = %handle.job_id, polls = poll, "Polling cancelled");
                    return Err(TrainingError::Cancelled(handle.job_id.0.clone()));
                }
                () = tokio::time::sleep(self.interval) => {}
            }

            let job = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!(
                        job_id = %handle.job_id,
                        polls = poll,
                        "Polling cancelled during query"
                    );
                    return Err(TrainingError::Cancelled(handle.job_id.0.clone()));
                }
                result = self.service.get_fine_tuning_job(handle.job_id.as_str()) => {
                    result.map_err(|e| {
                        error!(
                            job_id = %handle.job_id,
                            error = %e,
                            "Status query failed; stopping poll loop"
                        );
                        TrainingError::Remote(e)
                    })?
                }
            };

            poll += 1;
            if handle.apply(&job) {
                debug!(
                    job_id = %handle.job_id,
                    status = %handle.status,
                    "Training job status changed"
                );
            }
            progress.on_event(ProgressEvent::Polled {
                job_id: handle.job_id.clone(),
                poll,
                status: job.status,
            });
        }

        progress.on_event(ProgressEvent::Finished {
            job_id: handle.job_id.clone(),
            status: handle.status,
            model: handle.result_model_id.clone(),
        });
        Ok(handle)
    }
}
