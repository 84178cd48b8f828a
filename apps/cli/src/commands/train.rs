//! Training command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;
use lexis_core::{Config, Services, parse_rows, to_training_examples};
use lexis_training::{
    JobStatus, ProgressEvent, ProgressSink, StdoutProgressSink, TrainingJobHandle, render_timestamp,
};
use std::path::PathBuf;

use super::ctrl_c_token;

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV file of corrected pairs: English in column 1, translation in column 2
    pub input: PathBuf,

    /// Poll until the job finishes (Ctrl-C stops waiting, not the job)
    #[arg(short, long)]
    pub wait: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: TrainArgs, config: &Config) -> Result<()> {
    let contents = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let rows = parse_rows(contents)?;
    let examples = to_training_examples(&rows);
    if examples.is_empty() {
        bail!("{} has no translated rows to train on", args.input.display());
    }

    let services = Services::from_config(config)?;
    let handle = services
        .trainer
        .submit_training_job(&examples)
        .await
        .context("Training failed")?;

    if !args.wait {
        print_handle(&handle, args.json)?;
        return Ok(());
    }

    let sink = StdoutProgressSink;
    sink.on_event(ProgressEvent::submitted(&handle));
    let finished = services
        .poller
        .poll_until_terminal(handle, &ctrl_c_token(), &sink)
        .await
        .context("Stopped waiting for training job")?;
    print_handle(&finished, args.json)
}

/// Prints a job handle for humans or as JSON.
pub(crate) fn print_handle(handle: &TrainingJobHandle, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(handle)?);
        return Ok(());
    }

    let status = match handle.status {
        JobStatus::Succeeded => handle.status.to_string().green().bold(),
        JobStatus::Failed => handle.status.to_string().red().bold(),
        JobStatus::Queued | JobStatus::Running => handle.status.to_string().yellow(),
    };

    println!();
    println!("  Job:     {}", handle.job_id.as_str().cyan());
    println!("  Status:  {} ({})", status, handle.remote_status);
    if let Some(version) = &handle.version_label {
        println!("  Version: v{}", version);
    }
    if let Some(model) = &handle.result_model_id {
        println!("  Model:   {}", model.cyan());
    }
    println!("  Created: {}", render_timestamp(&handle.created_at).dimmed());
    println!();
    Ok(())
}
