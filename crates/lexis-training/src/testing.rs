//! Scripted in-memory fine-tuning service for unit tests.

use async_trait::async_trait;
use lexis_abstraction::{
    FineTuningJob, FineTuningService, FineTuningStatus, ModelError, UploadedFile,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub(crate) fn job(
    id: &str,
    status: FineTuningStatus,
    model: Option<&str>,
    created_at: i64,
) -> FineTuningJob {
    FineTuningJob {
        id: id.to_string(),
        status,
        fine_tuned_model: model.map(str::to_string),
        created_at,
    }
}

#[derive(Default)]
pub(crate) struct FakeFineTuning {
    pub uploads: Mutex<Vec<(String, String, String)>>,
    pub created: Mutex<Vec<(String, String)>>,
    pub statuses: Mutex<VecDeque<Result<FineTuningJob, ModelError>>>,
    pub listed: Vec<FineTuningJob>,
    pub upload_error: Option<ModelError>,
    pub create_error: Option<ModelError>,
    pub get_calls: AtomicUsize,
    pub calls: AtomicUsize,
}

impl FakeFineTuning {
    pub fn with_statuses(statuses: Vec<Result<FineTuningJob, ModelError>>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl FineTuningService for FakeFineTuning {
    async fn upload_dataset(
        &self,
        file_name: &str,
        content: Vec<u8>,
        purpose: &str,
    ) -> Result<UploadedFile, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.upload_error {
            return Err(err.clone());
        }
        self.uploads.lock().unwrap().push((
            file_name.to_string(),
            String::from_utf8(content).unwrap(),
            purpose.to_string(),
        ));
        Ok(UploadedFile {
            id: "file-abc123".to_string(),
        })
    }

    async fn create_fine_tuning_job(
        &self,
        training_file_id: &str,
        base_model: &str,
    ) -> Result<FineTuningJob, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.create_error {
            return Err(err.clone());
        }
        self.created
            .lock()
            .unwrap()
            .push((training_file_id.to_string(), base_model.to_string()));
        Ok(job(
            "ftjob-ABC123XYZ9",
            FineTuningStatus::ValidatingFiles,
            None,
            1_721_764_800,
        ))
    }

    async fn get_fine_tuning_job(&self, _job_id: &str) -> Result<FineTuningJob, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::Other("no scripted status left".to_string())))
    }

    async fn list_fine_tuning_jobs(&self, limit: u32) -> Result<Vec<FineTuningJob>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.listed.iter().take(limit as usize).cloned().collect())
    }
}
