//! CSV codec for translation tables.
//!
//! Input files have no header row. The first column is the English source
//! sentence; an optional second column holds the translation.

use crate::error::{LexisError, Result};
use lexis_training::TrainingExample;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Target value recorded for a sentence whose translation request failed.
pub const TRANSLATION_ERROR_SENTINEL: &str = "[Error]";

/// One sentence and its (possibly empty) translation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TranslationRow {
    pub source: String,
    pub target: String,
}

impl TranslationRow {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// A row whose translation request failed.
    pub fn failed(source: impl Into<String>) -> Self {
        Self::new(source, TRANSLATION_ERROR_SENTINEL)
    }

    pub fn is_error(&self) -> bool {
        self.target == TRANSLATION_ERROR_SENTINEL
    }

    /// Whether this row can be used as a training pair.
    pub fn is_trainable(&self) -> bool {
        !self.source.trim().is_empty() && !self.target.trim().is_empty() && !self.is_error()
    }
}

/// Reads the source sentence of every row.
pub fn parse_source_rows(contents: impl AsRef<[u8]>) -> Result<Vec<String>> {
    Ok(parse_rows(contents)?
        .into_iter()
        .map(|row| row.source)
        .collect())
}

/// Reads `(source, target)` rows; a missing second column yields an empty target.
///
/// Fields are kept exactly as written. Unreadable records are skipped with a
/// warning, as are rows whose first column is empty. Fails with `Parse` only
/// when the input held records and none of them could be read.
pub fn parse_rows(contents: impl AsRef<[u8]>) -> Result<Vec<TranslationRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(contents.as_ref());

    let mut rows = Vec::new();
    let mut readable = 0usize;
    let mut unreadable = 0usize;
    let mut last_error = None;

    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(record = line + 1, error = %e, "Skipping unreadable CSV record");
                unreadable += 1;
                last_error = Some(e);
                continue;
            }
        };
        readable += 1;

        let source = record.get(0).unwrap_or_default();
        if source.is_empty() {
            continue;
        }
        let target = record.get(1).unwrap_or_default();
        rows.push(TranslationRow::new(source, target));
    }

    if readable == 0 {
        if let Some(e) = last_error {
            return Err(LexisError::Parse(format!(
                "no readable rows ({unreadable} skipped): {e}"
            )));
        }
    }

    debug!(rows = rows.len(), skipped = unreadable, "Parsed translation table");
    Ok(rows)
}

/// Pairs every trainable row, preserving order.
pub fn to_training_examples(rows: &[TranslationRow]) -> Vec<TrainingExample> {
    rows.iter()
        .filter(|row| row.is_trainable())
        .map(|row| TrainingExample::new(row.source.trim(), row.target.trim()))
        .collect()
}

/// Writes rows as two-column CSV without a header.
pub fn serialize_rows(rows: &[TranslationRow]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record([row.source.as_str(), row.target.as_str()])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| LexisError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| LexisError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source_rows_reads_first_column() {
        let rows = parse_source_rows("Good morning\nThank you,Ευχαριστώ\n").unwrap();
        assert_eq!(rows, vec!["Good morning", "Thank you"]);
    }

    #[test]
    fn test_blank_lines_and_empty_sources_skipped() {
        let rows = parse_source_rows("Hello\n\n,orphan\nBye\n").unwrap();
        assert_eq!(rows, vec!["Hello", "Bye"]);
    }

    #[test]
    fn test_fields_keep_surrounding_whitespace() {
        let rows = parse_rows("  Good morning , Καλημέρα\n   \n").unwrap();
        assert_eq!(
            rows,
            vec![
                TranslationRow::new("  Good morning ", " Καλημέρα"),
                TranslationRow::new("   ", ""),
            ]
        );
    }

    #[test]
    fn test_quoted_fields() {
        let rows = parse_rows("\"Hello, world\",\"Γεια σου, κόσμε\"\n").unwrap();
        assert_eq!(
            rows,
            vec![TranslationRow::new("Hello, world", "Γεια σου, κόσμε")]
        );
    }

    #[test]
    fn test_empty_input_is_empty() {
        assert!(parse_rows("").unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_record_is_skipped() {
        let mut input = b"Hello\n".to_vec();
        input.extend_from_slice(b"\xff\xfe broken\n");
        input.extend_from_slice(b"Bye\n");

        let rows = parse_source_rows(input).unwrap();
        assert_eq!(rows, vec!["Hello", "Bye"]);
    }

    #[test]
    fn test_all_records_unreadable_is_parse_error() {
        let err = parse_rows(b"\xff\xfe\n\xc3\x28\n".as_slice()).unwrap_err();
        assert!(matches!(err, LexisError::Parse(_)));
    }

    #[test]
    fn test_to_training_examples_filters_unusable_rows() {
        let rows = vec![
            TranslationRow::new("Good morning", "Καλημέρα"),
            TranslationRow::new("Untranslated", ""),
            TranslationRow::new("Broken", TRANSLATION_ERROR_SENTINEL),
            TranslationRow::new(" Thank you ", "Ευχαριστώ "),
            TranslationRow::new("Spaces", "   "),
        ];

        let examples = to_training_examples(&rows);
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].prompt, "Good morning");
        assert_eq!(examples[0].completion, "Καλημέρα");
        assert_eq!(examples[1].prompt, "Thank you");
        assert_eq!(examples[1].completion, "Ευχαριστώ");
    }

    #[test]
    fn test_serialize_rows_quotes_as_needed() {
        let rows = vec![
            TranslationRow::new("Good morning", "Καλημέρα"),
            TranslationRow::new("Hello, world", "say \"hi\""),
        ];
        let csv = serialize_rows(&rows).unwrap();
        assert_eq!(
            csv,
            "Good morning,Καλημέρα\n\"Hello, world\",\"say \"\"hi\"\"\"\n"
        );
    }

    #[test]
    fn test_serialized_rows_parse_back_to_sources() {
        let rows = vec![
            TranslationRow::new("Good morning", "Καλημέρα"),
            TranslationRow::new("Line one, with comma", ""),
            TranslationRow::failed("Thank you"),
        ];
        let csv = serialize_rows(&rows).unwrap();

        let sources: Vec<String> = rows.iter().map(|r| r.source.clone()).collect();
        assert_eq!(parse_source_rows(&csv).unwrap(), sources);
        assert_eq!(parse_rows(&csv).unwrap(), rows);
    }

    #[test]
    fn test_padded_sources_survive_round_trip() {
        let rows = vec![
            TranslationRow::new("  Good morning", "Καλημέρα"),
            TranslationRow::new("Thank you ", ""),
            TranslationRow::new("   ", ""),
        ];
        let csv = serialize_rows(&rows).unwrap();
        assert_eq!(csv, "  Good morning,Καλημέρα\nThank you ,\n   ,\n");

        assert_eq!(
            parse_source_rows(&csv).unwrap(),
            vec!["  Good morning", "Thank you ", "   "]
        );
        assert_eq!(parse_rows(&csv).unwrap(), rows);
    }
}
