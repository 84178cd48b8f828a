//! OpenAI Files and Fine-tuning API client.
//!
//! Uploads JSONL training files and creates, retrieves, and lists
//! fine-tuning jobs.

use crate::http::{DEFAULT_BASE_URL, check_status, network_error};
use async_trait::async_trait;
use lexis_abstraction::{FineTuningJob, FineTuningService, ModelError, UploadedFile};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Client for the OpenAI fine-tuning endpoints.
#[derive(Debug, Clone)]
pub struct OpenAIFineTuning {
    /// API key for authentication.
    api_key: String,
    /// Base URL for the API.
    base_url: String,
    /// HTTP client for making requests.
    client: Client,
}

impl OpenAIFineTuning {
    #[must_use]
    pub fn with_api_key(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl FineTuningService for OpenAIFineTuning {
    async fn upload_dataset(
        &self,
        file_name: &str,
        content: Vec<u8>,
        purpose: &str,
    ) -> Result<UploadedFile, ModelError> {
        debug!(
            file_name = %file_name,
            bytes = content.len(),
            purpose = %purpose,
            "Uploading dataset"
        );

        let part = Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str("application/jsonl")
            .map_err(|e| ModelError::RequestError(format!("Failed to set MIME type: {}", e)))?;
        let form = Form::new()
            .text("purpose", purpose.to_string())
            .part("file", part);

        let response = self
            .client
            .post(format!("{}/files", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| network_error(&e, "dataset upload"))?;
        let response = check_status(response, "dataset upload").await?;

        let file: UploadedFile = response.json().await.map_err(|e| {
            ModelError::SerializationError(format!("Failed to parse upload response: {}", e))
        })?;

        debug!(file_id = %file.id, "Dataset uploaded");
        Ok(file)
    }

    async fn create_fine_tuning_job(
        &self,
        training_file_id: &str,
        base_model: &str,
    ) -> Result<FineTuningJob, ModelError> {
        debug!(
            training_file = %training_file_id,
            base_model = %base_model,
            "Creating fine-tuning job"
        );

        let body = CreateJobRequest {
            training_file: training_file_id,
            model: base_model,
        };
        let response = self
            .client
            .post(format!("{}/fine_tuning/jobs", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| network_error(&e, "create fine-tuning job"))?;
        let response = check_status(response, "create fine-tuning job").await?;

        let job: FineTuningJob = response.json().await.map_err(|e| {
            ModelError::SerializationError(format!("Failed to parse job response: {}", e))
        })?;

        debug!(job_id = %job.id, status = %job.status, "Fine-tuning job created");
        Ok(job)
    }

    async fn get_fine_tuning_job(&self, job_id: &str) -> Result<FineTuningJob, ModelError> {
        debug!(job_id = %job_id, "Retrieving fine-tuning job");

        let operation = format!("retrieve fine-tuning job {}", job_id);
        let response = self
            .client
            .get(format!("{}/fine_tuning/jobs/{}", self.base_url, job_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| network_error(&e, &operation))?;
        let response = check_status(response, &operation).await?;

        response.json().await.map_err(|e| {
            ModelError::SerializationError(format!("Failed to parse job response: {}", e))
        })
    }

    async fn list_fine_tuning_jobs(&self, limit: u32) -> Result<Vec<FineTuningJob>, ModelError> {
        debug!(limit = limit, "Listing fine-tuning jobs");

        let response = self
            .client
            .get(format!("{}/fine_tuning/jobs", self.base_url))
            .query(&[("limit", limit)])
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| network_error(&e, "list fine-tuning jobs"))?;
        let response = check_status(response, "list fine-tuning jobs").await?;

        let list: ListJobsResponse = response.json().await.map_err(|e| {
            ModelError::SerializationError(format!("Failed to parse job list: {}", e))
        })?;

        debug!(count = list.data.len(), "Retrieved fine-tuning jobs");
        Ok(list.data)
    }
}

#[derive(Debug, Serialize)]
struct CreateJobRequest<'a> {
    training_file: &'a str,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct ListJobsResponse {
    data: Vec<FineTuningJob>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_job_request_serialization() {
        let body = CreateJobRequest {
            training_file: "file-abc",
            model: "gpt-4o-mini-2024-07-18",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["training_file"], "file-abc");
        assert_eq!(json["model"], "gpt-4o-mini-2024-07-18");
    }

    #[test]
    fn test_list_response_deserialization() {
        let json = serde_json::json!({
            "object": "list",
            "data": [
                {
                    "id": "ftjob-1",
                    "status": "succeeded",
                    "fine_tuned_model": "ft:gpt-4o-mini:acme::abcde",
                    "created_at": 1_700_000_000
                },
                {
                    "id": "ftjob-2",
                    "status": "failed",
                    "fine_tuned_model": null,
                    "created_at": 1_700_000_100
                }
            ],
            "has_more": false
        });
        let list: ListJobsResponse = serde_json::from_value(json).unwrap();
        assert_eq!(list.data.len(), 2);
        assert_eq!(
            list.data[0].fine_tuned_model.as_deref(),
            Some("ft:gpt-4o-mini:acme::abcde")
        );
    }
}
