//! Wiring of the remote clients and orchestrators from configuration.

use crate::config::Config;
use crate::error::{LexisError, Result};
use crate::translation::TranslationOrchestrator;
use lexis_abstraction::{FineTuningService, ModelProvider};
use lexis_models::{OpenAIFineTuning, OpenAIProvider};
use lexis_training::{
    JobPoller, ModelDescriptor, ModelOrdering, TrainingOrchestrator, TrainingResult,
    list_completed_models,
};
use std::sync::Arc;
use tracing::debug;

/// Everything the CLI and HTTP server need to serve a request.
#[derive(Clone)]
pub struct Services {
    pub translator: TranslationOrchestrator,
    pub trainer: TrainingOrchestrator,
    pub poller: JobPoller,
    pub fine_tuning: Arc<dyn FineTuningService>,
    pub list_limit: u32,
    pub model_ordering: ModelOrdering,
}

impl Services {
    /// Builds services backed by the configured OpenAI-compatible endpoint.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.api_key()?.to_string();
        let client = reqwest::Client::builder()
            .timeout(config.openai.request_timeout())
            .build()
            .map_err(|e| LexisError::Config(format!("failed to build HTTP client: {e}")))?;

        let provider = OpenAIProvider::new(api_key.clone())
            .with_base_url(&config.openai.base_url)
            .with_client(client.clone());
        let fine_tuning = OpenAIFineTuning::with_api_key(api_key)
            .with_base_url(&config.openai.base_url)
            .with_client(client);

        debug!(base_url = %config.openai.base_url, "Configured remote clients");
        Self::new(config, Arc::new(provider), Arc::new(fine_tuning))
    }

    /// Builds services over arbitrary remote implementations.
    pub fn new(
        config: &Config,
        provider: Arc<dyn ModelProvider>,
        fine_tuning: Arc<dyn FineTuningService>,
    ) -> Result<Self> {
        config.validate()?;
        let translator = TranslationOrchestrator::from_config(provider, &config.translation)?;
        let trainer = TrainingOrchestrator::new(Arc::clone(&fine_tuning))
            .with_base_model(&config.training.base_model);
        let poller = JobPoller::new(Arc::clone(&fine_tuning))
            .with_interval(config.training.poll_interval());

        Ok(Self {
            translator,
            trainer,
            poller,
            fine_tuning,
            list_limit: config.training.list_limit,
            model_ordering: config.training.model_ordering,
        })
    }

    /// Lists completed models using the configured limit and ordering.
    pub async fn list_models(&self) -> TrainingResult<Vec<ModelDescriptor>> {
        self.list_models_with_limit(self.list_limit).await
    }

    pub async fn list_models_with_limit(
        &self,
        limit: u32,
    ) -> TrainingResult<Vec<ModelDescriptor>> {
        list_completed_models(self.fine_tuning.as_ref(), limit, self.model_ordering).await
    }
}
