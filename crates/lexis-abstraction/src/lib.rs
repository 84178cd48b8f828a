//! Remote service abstraction layer for Lexis.
//!
//! This crate defines the traits and types the translation and training
//! orchestrators use to talk to a language-model provider, without tying them
//! to a concrete HTTP client.

pub mod fine_tuning;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

pub use fine_tuning::{FineTuningJob, FineTuningService, FineTuningStatus, UploadedFile};

/// Represents an error that can occur when interacting with the remote service.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelError {
    /// An error occurred during the API request (e.g., network issues, invalid request).
    #[error("Request Error: {0}")]
    RequestError(String),

    /// The model returned an error (e.g., invalid input, unknown model).
    #[error("Model Response Error: {0}")]
    ModelResponseError(String),

    /// An error occurred during serialization or deserialization.
    #[error("Serialization Error: {0}")]
    SerializationError(String),

    /// The provider is not configured (missing API key, rejected credentials).
    #[error("Unsupported Model Provider: {0}")]
    UnsupportedModelProvider(String),

    /// Provider quota exceeded or rate limit hit.
    #[error("Provider '{provider}' quota exceeded{}", detail_suffix(message))]
    QuotaExceeded {
        /// The provider name (e.g., "openai").
        provider: String,
        /// Optional error message from the provider.
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Other unexpected errors.
    #[error("Other Model Error: {0}")]
    Other(String),
}

fn detail_suffix(message: &Option<String>) -> String {
    message.as_ref().map(|m| format!(": {m}")).unwrap_or_default()
}

/// Represents a message in a conversation with a chat model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message sender ("user", "assistant", "system").
    pub role: String,
    /// The content of the message.
    pub content: String,
}

impl ChatMessage {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Parameters for controlling the model's generation.
///
/// Every field is optional; unset fields are left to the provider's defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelParameters {
    /// What sampling temperature to use, between 0 and 2.
    pub temperature: Option<f32>,

    /// Nucleus sampling probability mass.
    pub top_p: Option<f32>,

    /// The maximum number of tokens to generate in the chat completion.
    pub max_tokens: Option<u32>,

    /// Up to 4 sequences where the API will stop generating further tokens.
    pub stop_sequences: Option<Vec<String>>,
}

/// The response from a chat completion model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    /// The generated content.
    pub content: String,

    /// Optional: The ID of the model used to generate the response.
    pub model_id: Option<String>,

    /// Optional: Usage statistics for the request.
    pub usage: Option<ModelUsage>,
}

/// Usage statistics for a model request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelUsage {
    /// Number of tokens in the prompt.
    pub prompt_tokens: u32,

    /// Number of tokens in the completion.
    pub completion_tokens: u32,

    /// Total number of tokens used.
    pub total_tokens: u32,
}

/// A trait for interacting with a single chat model.
///
/// All models must be `Send + Sync` to allow concurrent use across tasks.
#[async_trait]
pub trait Model: Send + Sync {
    /// Generates a chat completion based on the given conversation history.
    ///
    /// # Errors
    /// Returns a `ModelError` if generation fails.
    async fn generate_chat_completion(
        &self,
        messages: &[ChatMessage],
        parameters: Option<ModelParameters>,
    ) -> Result<ModelResponse, ModelError>;

    /// Returns the ID of the model.
    fn model_id(&self) -> &str;
}

/// Resolves a model identifier (base or fine-tuned) into a callable model.
pub trait ModelProvider: Send + Sync {
    /// Returns a model bound to `model_id`.
    ///
    /// # Errors
    /// Returns a `ModelError` if the provider cannot serve the model.
    fn model(&self, model_id: &str) -> Result<Arc<dyn Model>, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_exceeded_display() {
        let err = ModelError::QuotaExceeded {
            provider: "openai".to_string(),
            message: Some("slow down".to_string()),
        };
        assert_eq!(err.to_string(), "Provider 'openai' quota exceeded: slow down");

        let err = ModelError::QuotaExceeded {
            provider: "openai".to_string(),
            message: None,
        };
        assert_eq!(err.to_string(), "Provider 'openai' quota exceeded");
    }

    #[test]
    fn test_chat_message_constructors() {
        assert_eq!(ChatMessage::system("s").role, "system");
        assert_eq!(ChatMessage::user("u").role, "user");
        let msg = ChatMessage::assistant("Καλημέρα");
        assert_eq!(msg.role, "assistant");
        assert_eq!(msg.content, "Καλημέρα");
    }

    #[test]
    fn test_model_parameters_default_is_empty() {
        let params = ModelParameters::default();
        assert!(params.temperature.is_none());
        assert!(params.max_tokens.is_none());
    }
}
