//! Faultline CLI binary.

use anyhow::Result;
use faultline::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the faultline CLI.
///
/// Uses tokio's `current_thread` runtime: the CLI runs one command with a
/// handful of sequential file operations.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Controlled via RUST_LOG, e.g. RUST_LOG=faultline=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("faultline=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting faultline CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("Faultline CLI completed successfully");
    Ok(())
}
