//! Status command implementation.

use anyhow::{Context, Result};
use clap::Args;
use lexis_core::{Config, Services};
use lexis_training::{ProgressSink, StdoutProgressSink, TracingProgressSink};

use super::ctrl_c_token;
use super::train::print_handle;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Fine-tuning job ID (e.g. ftjob-abc123)
    pub job_id: String,

    /// Keep polling until the job succeeds or fails
    #[arg(short, long)]
    pub wait: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: StatusArgs, config: &Config) -> Result<()> {
    let services = Services::from_config(config)?;
    let handle = services
        .poller
        .fetch_status(&args.job_id)
        .await
        .with_context(|| format!("Failed to check status of {}", args.job_id))?;

    let handle = if args.wait && !handle.is_terminal() {
        // JSON output stays machine-readable; progress goes to the log instead.
        let sink: &dyn ProgressSink = if args.json {
            &TracingProgressSink
        } else {
            &StdoutProgressSink
        };
        services
            .poller
            .poll_until_terminal(handle, &ctrl_c_token(), sink)
            .await
            .context("Stopped waiting")?
    } else {
        handle
    };

    print_handle(&handle, args.json)
}
