use crate::error::{TrainingError, TrainingResult};
use crate::job::{model_version_label, render_timestamp, timestamp_from_epoch};
use chrono::{DateTime, Utc};
use lexis_abstraction::{FineTuningJob, FineTuningService, FineTuningStatus};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_LIST_LIMIT: u32 = 20;

/// How completed models are ordered, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelOrdering {
    /// Compare the rendered `created` strings. Matches the web UI's historical
    /// order but is not chronological across months or AM/PM boundaries.
    #[default]
    RenderedText,
    /// Compare the underlying creation timestamps.
    Timestamp,
}

/// A fine-tuned model that is ready to translate with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    pub version_label: String,
    pub created_at: DateTime<Utc>,
    /// `created_at` as shown to users.
    pub created: String,
}

impl ModelDescriptor {
    /// Describes a job's model, if the job succeeded and produced one.
    pub fn from_job(job: &FineTuningJob) -> Option<Self> {
        if job.status != FineTuningStatus::Succeeded {
            return None;
        }
        let id = job.fine_tuned_model.as_deref().filter(|m| !m.is_empty())?;
        let created_at = timestamp_from_epoch(job.created_at);
        Some(Self {
            id: id.to_string(),
            version_label: model_version_label(id),
            created: render_timestamp(&created_at),
            created_at,
        })
    }
}

/// Filters a job list down to completed models and sorts them newest first.
pub fn completed_models(jobs: &[FineTuningJob], ordering: ModelOrdering) -> Vec<ModelDescriptor> {
    let mut models: Vec<ModelDescriptor> =
        jobs.iter().filter_map(ModelDescriptor::from_job).collect();
    match ordering {
        ModelOrdering::RenderedText => models.sort_by(|a, b| b.created.cmp(&a.created)),
        ModelOrdering::Timestamp => models.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
    models
}

/// Lists models produced by the most recent `limit` fine-tuning jobs.
pub async fn list_completed_models(
    service: &dyn FineTuningService,
    limit: u32,
    ordering: ModelOrdering,
) -> TrainingResult<Vec<ModelDescriptor>> {
    let jobs = service
        .list_fine_tuning_jobs(limit)
        .await
        .map_err(TrainingError::Remote)?;
    let models = completed_models(&jobs, ordering);
    debug!(jobs = jobs.len(), models = models.len(), "Resolved completed models");
    Ok(models)
}
