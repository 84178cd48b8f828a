//! Sentence-by-sentence translation through a chat model.

use crate::batch::{BatchProcessor, ProgressCallback};
use crate::codec::TranslationRow;
use crate::config::TranslationConfig;
use crate::error::{LexisError, Result};
use lexis_abstraction::{ChatMessage, ModelParameters, ModelProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_TARGET_LANGUAGE: &str = "Greek";

/// Translates sentences with one independent chat completion each.
#[derive(Clone)]
pub struct TranslationOrchestrator {
    provider: Arc<dyn ModelProvider>,
    target_language: String,
    batch: BatchProcessor,
    parameters: Option<ModelParameters>,
}

impl TranslationOrchestrator {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            batch: BatchProcessor::default(),
            parameters: None,
        }
    }

    /// Builds an orchestrator from the `[translation]` config section.
    pub fn from_config(
        provider: Arc<dyn ModelProvider>,
        config: &TranslationConfig,
    ) -> Result<Self> {
        let mut orchestrator = Self::new(provider)
            .with_target_language(&config.target_language)
            .with_concurrency(config.concurrency)?;
        if let Some(after) = config.item_timeout() {
            orchestrator = orchestrator.with_item_timeout(after);
        }
        orchestrator.parameters = config.temperature.map(|t| ModelParameters {
            temperature: Some(t),
            ..Default::default()
        });
        Ok(orchestrator)
    }

    #[must_use]
    pub fn with_target_language(mut self, language: impl Into<String>) -> Self {
        self.target_language = language.into();
        self
    }

    /// Caps the number of translation requests in flight.
    pub fn with_concurrency(mut self, concurrency: usize) -> Result<Self> {
        let timeout = self.batch.timeout();
        let mut batch =
            BatchProcessor::new(concurrency).map_err(|e| LexisError::Config(e.to_string()))?;
        if let Some(after) = timeout {
            batch = batch.with_timeout(after);
        }
        self.batch = batch;
        Ok(self)
    }

    /// Marks a sentence failed when its reply takes longer than `after`.
    #[must_use]
    pub fn with_item_timeout(mut self, after: Duration) -> Self {
        self.batch = self.batch.with_timeout(after);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.batch.concurrency()
    }

    pub fn system_prompt(&self) -> String {
        format!("Translate the following into {}.", self.target_language)
    }

    fn messages(&self, text: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system_prompt()),
            ChatMessage::user(text),
        ]
    }

    /// Translates a single sentence. Remote failures propagate.
    pub async fn translate_one(&self, text: &str, model_id: &str) -> Result<String> {
        if text.is_empty() {
            return Err(LexisError::InvalidArgument("text is required".to_string()));
        }
        let model_id = require_model_id(model_id)?;

        let model = self.provider.model(model_id)?;
        let response = model
            .generate_chat_completion(&self.messages(text), self.parameters.clone())
            .await?;
        debug!(model = %model_id, "Translated single sentence");
        Ok(response.content.trim().to_string())
    }

    /// Translates every sentence, returning rows in input order.
    ///
    /// A failed sentence gets the `[Error]` target instead of failing the batch.
    pub async fn translate_all(
        &self,
        sources: &[String],
        model_id: &str,
    ) -> Result<Vec<TranslationRow>> {
        self.translate_all_with_progress(sources, model_id, None)
            .await
    }

    /// Same as [`translate_all`](Self::translate_all), reporting each finished item.
    pub async fn translate_all_with_progress(
        &self,
        sources: &[String],
        model_id: &str,
        progress: Option<ProgressCallback>,
    ) -> Result<Vec<TranslationRow>> {
        let model_id = require_model_id(model_id)?;
        if sources.is_empty() {
            return Ok(Vec::new());
        }

        let model = self.provider.model(model_id)?;
        let system_prompt: Arc<str> = Arc::from(self.system_prompt());
        let parameters = self.parameters.clone();

        info!(
            model = %model_id,
            sentences = sources.len(),
            concurrency = self.batch.concurrency(),
            "Translating batch"
        );

        let result = self
            .batch
            .process_batch(
                sources.to_vec(),
                move |_, text: String| {
                    let model = Arc::clone(&model);
                    let messages = vec![
                        ChatMessage::system(&*system_prompt),
                        ChatMessage::user(text),
                    ];
                    let parameters = parameters.clone();
                    async move {
                        model
                            .generate_chat_completion(&messages, parameters)
                            .await
                            .map(|response| response.content.trim().to_string())
                            .map_err(|e| e.to_string())
                    }
                },
                progress,
            )
            .await;

        let rows: Vec<TranslationRow> = sources
            .iter()
            .zip(result.into_outcomes())
            .map(|(source, outcome)| match outcome {
                Ok(target) => TranslationRow::new(source.as_str(), target),
                Err(e) => {
                    warn!(error = %e, "Translation failed; marking row");
                    TranslationRow::failed(source.as_str())
                }
            })
            .collect();

        let failed = rows.iter().filter(|row| row.is_error()).count();
        info!(
            model = %model_id,
            sentences = rows.len(),
            failed = failed,
            "Batch translation finished"
        );
        Ok(rows)
    }
}

fn require_model_id(model_id: &str) -> Result<&str> {
    let model_id = model_id.trim();
    if model_id.is_empty() {
        return Err(LexisError::InvalidArgument(
            "model id is required".to_string(),
        ));
    }
    Ok(model_id)
}
