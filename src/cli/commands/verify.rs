//! CLI implementation for `testsync verify` command
//!
//! Reports local drift from what a sync would produce.

use anyhow::{bail, Result};

use crate::cli::output::{spinner, status};
use crate::core::config::SyncConfig;
use crate::core::sync::SyncOptions;
use crate::core::verify::{verify_tests, FileStatus};
use crate::infra::download::DownloadManager;

/// Execute the verify command
pub async fn execute(
    config: &SyncConfig,
    parallel: usize,
    tag: Option<String>,
    quiet: bool,
) -> Result<()> {
    let options = SyncOptions {
        parallel: parallel.max(1),
        version: tag,
    };

    let pb = spinner("Comparing with upstream...", quiet);
    let result = verify_tests(config, &DownloadManager::new(), &options).await;
    pb.finish_and_clear();
    let report = result?;

    if !quiet {
        for file in &report.files {
            match &file.status {
                FileStatus::UpToDate => println!("{} {}", status::SUCCESS, file.name),
                FileStatus::Modified { expected, actual } => println!(
                    "{} {} modified (expected {}, found {})",
                    status::ERROR,
                    file.name,
                    &expected[..12],
                    &actual[..12]
                ),
                FileStatus::Missing => println!("{} {} missing", status::ERROR, file.name),
            }
        }
        for path in &report.stray {
            println!("{} {} is not produced by sync", status::WARNING, path.display());
        }
    }

    if report.is_clean() {
        if !quiet {
            println!("Up to date with upstream {}", report.version);
        }
        Ok(())
    } else {
        bail!(
            "{} is out of sync with upstream {}; run 'testsync sync'",
            config.download_dir.display(),
            report.version
        )
    }
}
