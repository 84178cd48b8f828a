use crate::dataset::{TrainingExample, build_jsonl, validate_examples};
use crate::error::{TrainingError, TrainingResult};
use crate::job::TrainingJobHandle;
use chrono::Utc;
use lexis_abstraction::FineTuningService;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Base model fine-tuned when none is configured.
pub const DEFAULT_BASE_MODEL: &str = "gpt-4o-mini-2024-07-18";

/// Upload purpose required by the fine-tuning API.
pub const FINE_TUNE_PURPOSE: &str = "fine-tune";

/// Turns corrected translation pairs into a remote fine-tuning job.
#[derive(Clone)]
pub struct TrainingOrchestrator {
    service: Arc<dyn FineTuningService>,
    base_model: String,
}

impl TrainingOrchestrator {
    pub fn new(service: Arc<dyn FineTuningService>) -> Self {
        Self {
            service,
            base_model: DEFAULT_BASE_MODEL.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_model(mut self, base_model: impl Into<String>) -> Self {
        self.base_model = base_model.into();
        self
    }

    pub fn base_model(&self) -> &str {
        &self.base_model
    }

    /// Uploads `pairs` as a JSONL chat dataset and starts a fine-tuning job.
    ///
    /// Fails with `InvalidArgument` before any remote call when `pairs` is empty.
    /// Upload and job-creation failures surface as `Submission`.
    pub async fn submit_training_job(
        &self,
        pairs: &[TrainingExample],
    ) -> TrainingResult<TrainingJobHandle> {
        validate_examples(pairs)?;

        let payload = build_jsonl(pairs)?;
        let file_name = format!("training-{}.jsonl", Utc::now().timestamp_millis());
        debug!(
            file_name = %file_name,
            pairs = pairs.len(),
            bytes = payload.len(),
            "Built training dataset"
        );

        let file = self
            .service
            .upload_dataset(&file_name, payload.into_bytes(), FINE_TUNE_PURPOSE)
            .await
            .map_err(|e| {
                error!(error = %e, "Dataset upload failed");
                TrainingError::Submission(e)
            })?;

        let job = self
            .service
            .create_fine_tuning_job(&file.id, &self.base_model)
            .await
            .map_err(|e| {
                error!(error = %e, training_file = %file.id, "Fine-tuning job creation failed");
                TrainingError::Submission(e)
            })?;

        let handle = TrainingJobHandle::submitted(&job);
        info!(
            job_id = %handle.job_id,
            training_file = %file.id,
            base_model = %self.base_model,
            version = ?handle.version_label,
            "Fine-tuning job submitted"
        );
        Ok(handle)
    }
}
