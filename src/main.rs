//! testsync CLI - keep a local copy of an upstream test suite in sync
//!
//! Entry point for the testsync command-line application.

use anyhow::Result;
use clap::Parser;

use testsync::cli::output::{display_error, is_config_error};
use testsync::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(cli.log_level().into()),
        )
        .init();

    // Configuration mismatches get a plain message; anything else
    // propagates with its full error chain.
    match cli.run().await {
        Err(e) if is_config_error(&e) => {
            display_error(&e);
            std::process::exit(1);
        }
        other => other,
    }
}
