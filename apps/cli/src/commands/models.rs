//! Models command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use lexis_core::{Config, Services};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Args, Debug)]
pub struct ModelsArgs {
    /// Number of recent fine-tuning jobs to inspect (defaults to training.list_limit)
    #[arg(short = 'n', long)]
    pub limit: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct ModelView {
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Model")]
    id: String,
    #[tabled(rename = "Created")]
    created: String,
}

pub async fn execute(args: ModelsArgs, config: &Config) -> Result<()> {
    let services = Services::from_config(config)?;
    let limit = args.limit.unwrap_or(services.list_limit).max(1);
    let models = services
        .list_models_with_limit(limit)
        .await
        .context("Failed to fetch models")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&models)?);
        return Ok(());
    }

    println!();
    println!(
        "{}",
        format!("Fine-tuned Models ({})", models.len()).bold().cyan()
    );
    println!();

    if models.is_empty() {
        println!("  {}", "No completed fine-tuning jobs found.".dimmed());
        println!(
            "  {}",
            "Tip: submit corrected translations with `lexis train <csv>`.".dimmed()
        );
        return Ok(());
    }

    let views: Vec<ModelView> = models
        .into_iter()
        .map(|m| ModelView {
            version: m.version_label,
            id: m.id,
            created: m.created,
        })
        .collect();
    println!("{}", Table::new(views).with(Style::rounded()));
    println!();
    Ok(())
}
