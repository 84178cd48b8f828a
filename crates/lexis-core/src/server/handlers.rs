//! HTTP handlers for translation and fine-tuning.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use lexis_training::{TrainingError, TrainingExample, render_timestamp};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::AppState;
use super::error::ApiError;
use crate::error::LexisError;

/// One model in the `GET /models` response.
#[derive(Debug, Serialize)]
pub struct ModelEntry {
    pub id: String,
    pub version: String,
    pub created: String,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelEntry>,
}

/// GET /models
pub async fn list_models(
    State(state): State<AppState>,
) -> Result<Json<ModelsResponse>, ApiError> {
    let models = state.services.list_models().await.map_err(|e| {
        error!(error = %e, "Failed to fetch fine-tuned models");
        ApiError::internal("Failed to fetch models")
    })?;

    let models = models
        .into_iter()
        .map(|m| ModelEntry {
            id: m.id,
            version: m.version_label,
            created: m.created,
        })
        .collect();
    Ok(Json(ModelsResponse { models }))
}

#[derive(Debug, Deserialize)]
pub struct TrainStatusQuery {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TrainStatusResponse {
    /// Raw remote status string.
    pub status: String,
    pub model: Option<String>,
    pub version: Option<String>,
    pub created: String,
}

/// GET /train-status?id=<job id>
pub async fn train_status(
    State(state): State<AppState>,
    Query(query): Query<TrainStatusQuery>,
) -> Result<Json<TrainStatusResponse>, ApiError> {
    let job_id = query
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::BadRequest("Missing job ID"))?;

    let handle = state
        .services
        .poller
        .fetch_status(job_id)
        .await
        .map_err(|e| {
            error!(job_id = %job_id, error = %e, "Failed to check training status");
            ApiError::internal("Failed to check training status")
        })?;

    Ok(Json(TrainStatusResponse {
        status: handle.remote_status.as_str().to_string(),
        model: handle.result_model_id,
        version: handle.version_label,
        created: render_timestamp(&handle.created_at),
    }))
}

/// A corrected pair as sent by the editing UI.
#[derive(Debug, Deserialize)]
pub struct TrainingPair {
    #[serde(rename = "English")]
    pub english: String,
    #[serde(rename = "Greek")]
    pub greek: String,
}

#[derive(Debug, Serialize)]
pub struct TrainResponse {
    pub success: bool,
    pub job_id: String,
    pub model: Option<String>,
    /// Job label prefixed with `v`, e.g. `vXYZ9`.
    pub version: Option<String>,
    pub created: String,
}

/// POST /train
pub async fn train(
    State(state): State<AppState>,
    body: Result<Json<Vec<TrainingPair>>, JsonRejection>,
) -> Result<Json<TrainResponse>, ApiError> {
    let Json(pairs) = body.map_err(|e| {
        warn!(error = %e, "Rejected training payload");
        ApiError::BadRequest("Invalid training data")
    })?;
    if pairs.is_empty() {
        return Err(ApiError::BadRequest("Invalid training data"));
    }

    let examples: Vec<TrainingExample> = pairs
        .into_iter()
        .map(|pair| TrainingExample::new(pair.english, pair.greek))
        .collect();

    let handle = state
        .services
        .trainer
        .submit_training_job(&examples)
        .await
        .map_err(|e| match e {
            TrainingError::InvalidArgument(_) | TrainingError::Dataset(_) => {
                warn!(error = %e, "Rejected training data");
                ApiError::BadRequest("Invalid training data")
            }
            other => {
                error!(error = %other, "Training error");
                ApiError::Internal {
                    error: "Training failed",
                    details: Some(other.to_string()),
                }
            }
        })?;

    info!(job_id = %handle.job_id, pairs = examples.len(), "Training job started");
    Ok(Json(TrainResponse {
        success: true,
        job_id: handle.job_id.0,
        model: handle.result_model_id,
        version: handle.version_label.map(|label| format!("v{label}")),
        created: render_timestamp(&handle.created_at),
    }))
}

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub translation: String,
}

/// POST /translate
///
/// Any non-empty `text` is forwarded as is; the model id must not be blank.
pub async fn translate(
    State(state): State<AppState>,
    body: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    const MISSING: ApiError = ApiError::BadRequest("Missing text or model ID");

    let Json(request) = body.map_err(|e| {
        warn!(error = %e, "Rejected translate payload");
        MISSING
    })?;
    let text = request.text.filter(|t| !t.is_empty()).ok_or(MISSING)?;
    let model = request
        .model
        .filter(|m| !m.trim().is_empty())
        .ok_or(MISSING)?;

    let translation = state
        .services
        .translator
        .translate_one(&text, &model)
        .await
        .map_err(|e| match e {
            LexisError::InvalidArgument(_) => MISSING,
            other => {
                error!(model = %model, error = %other, "Translation API error");
                ApiError::internal("Translation failed")
            }
        })?;

    Ok(Json(TranslateResponse { translation }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
