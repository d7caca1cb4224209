//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod check;
pub mod rewrite;
pub mod sync;
pub mod verify;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Subcommand;

use crate::core::config::SyncConfig;
use crate::error::SyncError;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download upstream tests and rewrite them into the download directory
    Sync {
        /// Number of files fetched concurrently
        #[arg(short, long, default_value = "1")]
        parallel: usize,

        /// Upstream tag to sync instead of the configured one
        #[arg(long)]
        tag: Option<String>,
    },

    /// Rewrite a local copy of an upstream file without downloading
    Rewrite {
        /// File to rewrite
        file: PathBuf,

        /// Upstream file name to use for exclusions and the header
        /// (defaults to the file's name)
        #[arg(long)]
        name: Option<String>,

        /// Upstream tag named in the header (defaults to the configured one)
        #[arg(long)]
        tag: Option<String>,

        /// Write to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate the config file without downloading
    Check,

    /// Compare the download directory with a fresh rewrite of upstream
    Verify {
        /// Number of files fetched concurrently
        #[arg(short, long, default_value = "1")]
        parallel: usize,

        /// Upstream tag to compare against (defaults to the synced one)
        #[arg(long)]
        tag: Option<String>,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self, config_path: &Path, quiet: bool) -> Result<()> {
        let config = load_config(config_path)?;
        match self {
            Self::Sync { parallel, tag } => sync::execute(&config, parallel, tag, quiet).await,
            Self::Rewrite {
                file,
                name,
                tag,
                output,
            } => rewrite::execute(&config, &file, name, tag, output.as_deref()),
            Self::Check => {
                check::execute(&config, config_path, quiet);
                Ok(())
            }
            Self::Verify { parallel, tag } => verify::execute(&config, parallel, tag, quiet).await,
        }
    }
}

/// Load the config, keeping the error type visible to `main`
fn load_config(path: &Path) -> Result<SyncConfig> {
    SyncConfig::load(path)
        .map_err(SyncError::from)
        .map_err(anyhow::Error::from)
}
