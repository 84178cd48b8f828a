use crate::error::{TrainingError, TrainingResult};
use lexis_abstraction::ChatMessage;
use serde::{Deserialize, Serialize};

/// A corrected (source, target) pair used as one fine-tuning example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub prompt: String,
    pub completion: String,
}

impl TrainingExample {
    pub fn new(prompt: impl Into<String>, completion: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            completion: completion.into(),
        }
    }

    /// The two-turn chat record the fine-tuning API expects for this example.
    #[must_use]
    pub fn to_chat_record(&self) -> ChatRecord {
        ChatRecord {
            messages: vec![
                ChatMessage::user(self.prompt.clone()),
                ChatMessage::assistant(self.completion.clone()),
            ],
        }
    }
}

/// One JSONL line of a chat fine-tuning dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub messages: Vec<ChatMessage>,
}

pub fn validate_examples(examples: &[TrainingExample]) -> TrainingResult<()> {
    if examples.is_empty() {
        return Err(TrainingError::InvalidArgument(
            "at least one training pair is required".to_string(),
        ));
    }
    for (idx, ex) in examples.iter().enumerate() {
        if ex.prompt.trim().is_empty() {
            return Err(TrainingError::Dataset(format!("example[{idx}] prompt is empty")));
        }
        if ex.completion.trim().is_empty() {
            return Err(TrainingError::Dataset(format!("example[{idx}] completion is empty")));
        }
    }
    Ok(())
}

/// Serializes examples as newline-delimited chat records.
pub fn build_jsonl(examples: &[TrainingExample]) -> TrainingResult<String> {
    let lines = examples
        .iter()
        .map(|ex| serde_json::to_string(&ex.to_chat_record()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}
