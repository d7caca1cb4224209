//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no sync logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::defaults;
use commands::Commands;

/// testsync - keep a local copy of an upstream test suite in sync
///
/// Downloads upstream test files and rewrites them for the local harness.
#[derive(Parser, Debug)]
#[command(name = "testsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(
        short,
        long,
        global = true,
        env = "TESTSYNC_CONFIG",
        default_value = defaults::DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,

    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        if let Some(cmd) = self.command {
            cmd.run(&self.config, self.quiet).await
        } else {
            // No subcommand provided, show help
            use clap::CommandFactory;
            let mut cmd = Self::command();
            cmd.print_help()?;
            Ok(())
        }
    }

    /// Log level implied by `-v` and `-q`
    pub fn log_level(&self) -> tracing::Level {
        match (self.quiet, self.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::WARN,
            (false, 1) => tracing::Level::INFO,
            (false, _) => tracing::Level::DEBUG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::try_parse_from(["testsync", "check"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("testsync.toml"));
        assert!(matches!(cli.command, Some(Commands::Check)));
    }

    #[test]
    fn test_sync_arguments() {
        let cli = Cli::try_parse_from([
            "testsync", "-vv", "--config", "ci/sync.toml", "sync", "--parallel", "4", "--tag", "0.27.2",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("ci/sync.toml"));
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
        match cli.command {
            Some(Commands::Sync { parallel, tag }) => {
                assert_eq!(parallel, 4);
                assert_eq!(tag.as_deref(), Some("0.27.2"));
            }
            other => panic!("Expected sync, got {other:?}"),
        }
    }

    #[test]
    fn test_quiet_overrides_verbose() {
        let cli = Cli::try_parse_from(["testsync", "-q", "-v", "check"]).unwrap();
        assert_eq!(cli.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_rewrite_arguments() {
        let cli = Cli::try_parse_from([
            "testsync", "rewrite", "local/select.test.ts", "--name", "select.test.ts", "-o", "out.ts",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Rewrite { file, name, tag, output }) => {
                assert_eq!(file, PathBuf::from("local/select.test.ts"));
                assert_eq!(name.as_deref(), Some("select.test.ts"));
                assert_eq!(tag, None);
                assert_eq!(output, Some(PathBuf::from("out.ts")));
            }
            other => panic!("Expected rewrite, got {other:?}"),
        }
    }
}
