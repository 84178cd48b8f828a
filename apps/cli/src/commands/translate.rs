//! Translate command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;
use lexis_core::batch::{BatchProgress, ProgressCallback};
use lexis_core::{Config, Services, TranslationSession};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// CSV file with one English sentence per row (no header)
    pub input: PathBuf,

    /// Model to translate with (defaults to translation.default_model)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Where to write the edited CSV (defaults to edited-<input> beside the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Replace the translation of row N (1-based) before saving, e.g. `--edit 2=Καλημέρα`
    #[arg(short, long = "edit", value_name = "N=TEXT", value_parser = parse_edit)]
    pub edits: Vec<(usize, String)>,

    /// Print the rows as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

fn parse_edit(raw: &str) -> Result<(usize, String), String> {
    let (row, text) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected N=TEXT, got `{raw}`"))?;
    let row: usize = row
        .trim()
        .parse()
        .map_err(|_| format!("`{row}` is not a row number"))?;
    if row == 0 {
        return Err("row numbers start at 1".to_string());
    }
    Ok((row, text.to_string()))
}

#[derive(Tabled)]
struct RowView {
    #[tabled(rename = "#")]
    number: usize,
    #[tabled(rename = "English")]
    source: String,
    #[tabled(rename = "Greek")]
    target: String,
}

pub async fn execute(args: TranslateArgs, config: &Config) -> Result<()> {
    let model = match args.model.or_else(|| config.translation.default_model.clone()) {
        Some(model) => model,
        None => bail!("No model given: pass --model or set translation.default_model"),
    };

    let contents = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let file_name = args.input.file_name().map_or_else(
        || "translations.csv".to_string(),
        |n| n.to_string_lossy().into_owned(),
    );

    let services = Services::from_config(config)?;
    let mut session = TranslationSession::new(services.translator);

    let progress: ProgressCallback = Arc::new(|p: BatchProgress| {
        eprint!("\rTranslated {}/{}", p.completed, p.total);
    });
    session
        .load_with_progress(&file_name, contents, &model, Some(progress))
        .await
        .with_context(|| format!("Failed to translate {}", args.input.display()))?;
    eprintln!();

    for (row, text) in args.edits {
        session
            .edit(row - 1, text)
            .with_context(|| format!("Cannot edit row {row}"))?;
    }

    let output = args
        .output
        .unwrap_or_else(|| default_output(&args.input, session.export_file_name()));
    std::fs::write(&output, session.export_csv()?)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(session.rows())?);
    } else {
        let views: Vec<RowView> = session
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| RowView {
                number: i + 1,
                source: row.source.clone(),
                target: row.target.clone(),
            })
            .collect();
        println!("{}", Table::new(views).with(Style::rounded()));
    }

    let failed = session.failed_rows();
    if !failed.is_empty() {
        let numbers: Vec<String> = failed.iter().map(|i| (i + 1).to_string()).collect();
        let message = format!(
            "{} row(s) failed to translate: {}",
            failed.len(),
            numbers.join(", ")
        );
        eprintln!("{}", message.red());
    }
    eprintln!("{} {}", "Saved".green().bold(), output.display());
    Ok(())
}

fn default_output(input: &Path, export_name: Option<String>) -> PathBuf {
    let name = export_name.unwrap_or_else(|| "edited-translations.csv".to_string());
    input.parent().map_or_else(|| PathBuf::from(&name), |dir| dir.join(&name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edit() {
        assert_eq!(parse_edit("2=Καλημέρα"), Ok((2, "Καλημέρα".to_string())));
        assert_eq!(parse_edit("3=a=b"), Ok((3, "a=b".to_string())));
        assert!(parse_edit("0=x").is_err());
        assert!(parse_edit("x=y").is_err());
        assert!(parse_edit("novalue").is_err());
    }

    #[test]
    fn test_default_output_sits_beside_input() {
        let out = default_output(
            Path::new("/data/phrases.csv"),
            Some("edited-phrases.csv".to_string()),
        );
        assert_eq!(out, PathBuf::from("/data/edited-phrases.csv"));
    }
}
