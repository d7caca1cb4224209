//! CLI implementation for `testsync sync` command
//!
//! Downloads and rewrites every configured upstream file.

use anyhow::Result;

use crate::cli::output::{spinner, status};
use crate::core::config::SyncConfig;
use crate::core::sync::{sync_tests, SyncOptions};
use crate::infra::download::DownloadManager;

/// Execute the sync command
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

    let pb = spinner(
        &format!("Syncing {} upstream test file(s)...", config.files.len()),
        quiet,
    );
    let result = sync_tests(config, &DownloadManager::new(), &options).await;
    pb.finish_and_clear();
    let report = result?;

    if !quiet {
        println!(
            "{} Synced {} file(s) from upstream {} into {}",
            status::SUCCESS,
            report.files.len(),
            report.version,
            config.download_dir.display()
        );
        for file in &report.files {
            if file.skipped_tests > 0 {
                println!("    {} ({} skipped)", file.name, file.skipped_tests);
            } else {
                println!("    {}", file.name);
            }
        }
    }

    Ok(())
}
