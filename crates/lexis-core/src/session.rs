//! In-memory editable translation table.

use crate::batch::ProgressCallback;
use crate::codec::{self, TranslationRow};
use crate::error::{LexisError, Result};
use crate::translation::TranslationOrchestrator;
use lexis_training::TrainingExample;
use tracing::{debug, info};

/// Prefix added to the uploaded file name on export.
pub const EXPORT_PREFIX: &str = "edited-";

/// One loaded file and its editable translations.
pub struct TranslationSession {
    translator: TranslationOrchestrator,
    file_name: Option<String>,
    rows: Vec<TranslationRow>,
}

impl TranslationSession {
    pub fn new(translator: TranslationOrchestrator) -> Self {
        Self {
            translator,
            file_name: None,
            rows: Vec::new(),
        }
    }

    /// Parses `contents` and translates every sentence with `model_id`.
    ///
    /// The previous rows are replaced only when parsing and translation both
    /// succeed.
    pub async fn load(
        &mut self,
        file_name: &str,
        contents: impl AsRef<[u8]>,
        model_id: &str,
    ) -> Result<&[TranslationRow]> {
        self.load_with_progress(file_name, contents, model_id, None)
            .await
    }

    pub async fn load_with_progress(
        &mut self,
        file_name: &str,
        contents: impl AsRef<[u8]>,
        model_id: &str,
        progress: Option<ProgressCallback>,
    ) -> Result<&[TranslationRow]> {
        if model_id.trim().is_empty() {
            return Err(LexisError::InvalidArgument(
                "model id is required".to_string(),
            ));
        }
        let sources = codec::parse_source_rows(contents)?;
        let rows = self
            .translator
            .translate_all_with_progress(&sources, model_id, progress)
            .await?;

        info!(file = %file_name, rows = rows.len(), "Loaded translation session");
        self.file_name = Some(file_name.to_string());
        self.rows = rows;
        Ok(&self.rows)
    }

    pub fn rows(&self) -> &[TranslationRow] {
        &self.rows
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Replaces the translation at `index`.
    pub fn edit(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        let len = self.rows.len();
        let row = self.rows.get_mut(index).ok_or_else(|| {
            LexisError::InvalidArgument(format!("row {index} out of range (0..{len})"))
        })?;
        row.target = value.into();
        debug!(index = index, "Edited translation");
        Ok(())
    }

    /// Indexes of rows whose translation failed.
    pub fn failed_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.is_error())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn export_csv(&self) -> Result<String> {
        codec::serialize_rows(&self.rows)
    }

    /// `edited-<file name>`, once a file has been loaded.
    pub fn export_file_name(&self) -> Option<String> {
        self.file_name
            .as_ref()
            .map(|name| format!("{EXPORT_PREFIX}{name}"))
    }

    pub fn training_examples(&self) -> Vec<TrainingExample> {
        codec::to_training_examples(&self.rows)
    }
}
