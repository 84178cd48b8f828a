//! Command implementations for the Lexis CLI.

pub mod models;
pub mod status;
pub mod train;
pub mod translate;

use tokio_util::sync::CancellationToken;
use tracing::warn;

/// A token cancelled on the first Ctrl-C.
pub(crate) fn ctrl_c_token() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => trigger.cancel(),
            Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
        }
    });
    token
}
