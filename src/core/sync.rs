//! Sync orchestration
//!
//! Resolves the upstream version, empties the download directory, fetches
//! and rewrites every configured file, writes the results, and finishes
//! with the version marker. Any failure aborts the whole run.

use std::path::PathBuf;

use futures::stream::{self, StreamExt, TryStreamExt};

use crate::config::defaults;
use crate::core::config::SyncConfig;
use crate::core::resolver::{resolve_version, ResolvedVersion};
use crate::core::rewrite::rewrite;
use crate::core::version::VersionMarker;
use crate::error::SyncError;
use crate::infra::download::DownloadManager;
use crate::infra::filesystem;

/// Options for a sync run
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Number of files fetched and rewritten concurrently
    pub parallel: usize,
    /// Upstream tag overriding the configured one
    pub version: Option<String>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            parallel: defaults::DEFAULT_PARALLEL_DOWNLOADS,
            version: None,
        }
    }
}

/// An upstream file after rewriting, not yet written
#[derive(Debug, Clone)]
pub struct RewrittenFile {
    /// Upstream file name
    pub name: String,
    /// URL the raw text came from
    pub url: String,
    /// Final text
    pub text: String,
    /// Number of tests switched to skip form
    pub skipped_tests: usize,
}

/// A file written by the sync
#[derive(Debug, Clone)]
pub struct SyncedFile {
    /// Upstream file name
    pub name: String,
    /// Where it was written
    pub path: PathBuf,
    /// Size in bytes
    pub size: usize,
    /// Number of tests switched to skip form
    pub skipped_tests: usize,
}

/// Result of a sync run
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Upstream tag synced from
    pub version: String,
    /// Raw download base for that tag
    pub base_url: String,
    /// Files written, in configured order
    pub files: Vec<SyncedFile>,
    /// Path of the version marker
    pub marker_path: PathBuf,
}

/// Fetch one upstream file and rewrite it
pub async fn fetch_and_rewrite(
    config: &SyncConfig,
    downloader: &DownloadManager,
    resolved: &ResolvedVersion,
    file_name: &str,
    excluded_tests: &[String],
) -> Result<RewrittenFile, SyncError> {
    let url = resolved.file_url(config, file_name);
    tracing::info!("Fetching {url}");
    let raw = downloader.fetch_text(&url).await?;
    let text = rewrite(config, &url, file_name, &raw, excluded_tests)?;
    Ok(RewrittenFile {
        name: file_name.to_string(),
        url,
        text,
        skipped_tests: excluded_tests.len(),
    })
}

/// Fetch and rewrite every configured file.
///
/// Up to `parallel` files are in flight at once. Results keep the configured
/// order and the first failure cancels the rest.
pub async fn rewrite_all(
    config: &SyncConfig,
    downloader: &DownloadManager,
    resolved: &ResolvedVersion,
    parallel: usize,
) -> Result<Vec<RewrittenFile>, SyncError> {
    stream::iter(&config.files)
        .map(|(name, excluded)| fetch_and_rewrite(config, downloader, resolved, name, excluded))
        .buffered(parallel.max(1))
        .try_collect()
        .await
}

/// Run a full sync into `config.download_dir`
pub async fn sync_tests(
    config: &SyncConfig,
    downloader: &DownloadManager,
    options: &SyncOptions,
) -> Result<SyncReport, SyncError> {
    let resolved = resolve_version(config, downloader, options.version.as_deref()).await?;
    tracing::info!(
        "Syncing {} file(s) from upstream {}",
        config.files.len(),
        resolved.version
    );

    // Cleared once, before any file work, so nothing stale survives.
    filesystem::reset_dir(&config.download_dir)?;

    let rewritten = rewrite_all(config, downloader, &resolved, options.parallel).await?;

    let mut files = Vec::with_capacity(rewritten.len());
    for file in rewritten {
        let path = config.download_dir.join(&file.name);
        filesystem::write_file(&path, &file.text)?;
        tracing::info!("Wrote {}", path.display());
        files.push(SyncedFile {
            name: file.name,
            path,
            size: file.text.len(),
            skipped_tests: file.skipped_tests,
        });
    }

    let marker = VersionMarker::new(config, &resolved.version);
    let marker_path = config.download_dir.join(&config.harness.version_file);
    filesystem::write_file(&marker_path, &marker.render())?;

    Ok(SyncReport {
        version: resolved.version,
        base_url: resolved.base_url,
        files,
        marker_path,
    })
}
