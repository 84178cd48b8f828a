//! Lexis HTTP server - Entry Point

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lexis_core::{config::Config, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lexis_core=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting lexis-server");

    // Config path comes from LEXIS_CONFIG, else ./lexis.toml if present.
    let config = Config::load(None)
        .inspect_err(|e| error!(error = %e, "Failed to load configuration"))?;

    if let Err(e) = server::run(&config).await {
        error!(error = %e, "Server error");
        return Err(e.into());
    }
    Ok(())
}
