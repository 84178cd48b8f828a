//! Lexis CLI - Command-line interface for the Lexis translation trainer
//!
//! This CLI provides a `lexis` command for translating CSV files of English
//! sentences, submitting corrected pairs for fine-tuning, and tracking the
//! resulting jobs and models.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{models, status, train, translate};
use lexis_core::Config;

/// Lexis CLI - translate, correct, and fine-tune
#[derive(Parser, Debug)]
#[command(
    name = "lexis",
    author,
    version,
    about = "Lexis - English to Greek translation trainer",
    long_about = "Translates CSV files of English sentences with a chat model, exports the \
                  edited table, and fine-tunes new models from corrected translations."
)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    /// Config file (overrides LEXIS_CONFIG and ./lexis.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate every sentence of a CSV file
    ///
    /// Reads the first column of each row, translates it, and writes a
    /// two-column CSV (source, translation) to `edited-<file>` or `--output`.
    Translate(translate::TranslateArgs),

    /// Submit corrected translations as a fine-tuning job
    ///
    /// The CSV must have the source in the first column and the corrected
    /// translation in the second. Rows without a translation are skipped.
    Train(train::TrainArgs),

    /// Show the status of a fine-tuning job
    Status(status::StatusArgs),

    /// List fine-tuned models ready for translation
    Models(models::ModelsArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Command::Translate(cmd) => translate::execute(cmd, &config).await,
        Command::Train(cmd) => train::execute(cmd, &config).await,
        Command::Status(cmd) => status::execute(cmd, &config).await,
        Command::Models(cmd) => models::execute(cmd, &config).await,
    }
}
