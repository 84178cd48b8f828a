//! Remote service implementations for Lexis.
//!
//! This crate provides concrete implementations of the `Model`,
//! `ModelProvider`, and `FineTuningService` traits for OpenAI-compatible APIs.

pub mod fine_tuning;
mod http;
pub mod openai;

pub use fine_tuning::OpenAIFineTuning;
pub use http::DEFAULT_BASE_URL;
pub use openai::{OpenAIModel, OpenAIProvider};
