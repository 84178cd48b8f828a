//! Lexis Core
//!
//! Translation and fine-tuning orchestration for the Lexis translation trainer:
//! - CSV codec for `(source, target)` tables (`codec`)
//! - Bounded-concurrency translation of whole files (`translation`, `batch`)
//! - The editable in-memory table (`session`)
//! - Layered configuration (`config`)
//! - The axum HTTP API (`server`)

pub mod batch;
pub mod codec;
pub mod config;
pub mod error;
pub mod server;
pub mod services;
pub mod session;
pub mod translation;

pub use codec::{
    TRANSLATION_ERROR_SENTINEL, TranslationRow, parse_rows, parse_source_rows, serialize_rows,
    to_training_examples,
};
pub use config::Config;
pub use error::{LexisError, Result};
pub use services::Services;
pub use session::TranslationSession;
pub use translation::TranslationOrchestrator;
