//! Drift detection for a synced directory
//!
//! Recomputes what a sync would write and compares it, by SHA-256, with
//! what is on disk. Local edits, missing files, and leftovers that no
//! longer appear in the config are all reported.

use std::path::PathBuf;

use crate::core::config::SyncConfig;
use crate::core::resolver::resolve_version;
use crate::core::sync::{rewrite_all, SyncOptions};
use crate::core::version::VersionMarker;
use crate::error::SyncError;
use crate::infra::download::{compute_checksum, DownloadManager};
use crate::infra::filesystem;

/// State of one configured file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Matches what a sync would write
    UpToDate,
    /// Differs from what a sync would write
    Modified {
        /// Checksum of the expected content
        expected: String,
        /// Checksum of the content on disk
        actual: String,
    },
    /// Not present on disk
    Missing,
}

/// Verification outcome for one configured file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCheck {
    /// Upstream file name
    pub name: String,
    /// What was found
    pub status: FileStatus,
}

/// Result of verifying a synced directory
#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    /// Upstream tag compared against
    pub version: String,
    /// One entry per configured file, in configured order
    pub files: Vec<FileCheck>,
    /// Files on disk that a sync would not produce
    pub stray: Vec<PathBuf>,
}

impl VerifyReport {
    /// Whether the directory is exactly what a sync would produce
    pub fn is_clean(&self) -> bool {
        self.stray.is_empty() && self.files.iter().all(|f| f.status == FileStatus::UpToDate)
    }
}

/// Version recorded by the last sync, if the marker is present and readable
pub fn recorded_version(config: &SyncConfig) -> Option<String> {
    let path = config.download_dir.join(&config.harness.version_file);
    let text = filesystem::read_file(&path).ok()?;
    VersionMarker::parse(&text).map(|m| m.version)
}

/// Compare the download directory with a fresh rewrite of upstream.
///
/// Without a version in `options`, the version recorded by the last sync is
/// used, then the normal resolution rules.
pub async fn verify_tests(
    config: &SyncConfig,
    downloader: &DownloadManager,
    options: &SyncOptions,
) -> Result<VerifyReport, SyncError> {
    let version = options.version.clone().or_else(|| recorded_version(config));
    let resolved = resolve_version(config, downloader, version.as_deref()).await?;
    tracing::info!("Verifying {} against upstream {}", config.download_dir.display(), resolved.version);

    let expected = rewrite_all(config, downloader, &resolved, options.parallel).await?;

    let mut files = Vec::with_capacity(expected.len());
    for file in &expected {
        let path = config.download_dir.join(&file.name);
        let status = if path.is_file() {
            let actual = compute_checksum(&filesystem::read_bytes(&path)?);
            let expected = compute_checksum(file.text.as_bytes());
            if actual == expected {
                FileStatus::UpToDate
            } else {
                FileStatus::Modified { expected, actual }
            }
        } else {
            FileStatus::Missing
        };
        tracing::debug!("{}: {status:?}", file.name);
        files.push(FileCheck {
            name: file.name.clone(),
            status,
        });
    }

    let marker = PathBuf::from(&config.harness.version_file);
    let stray = filesystem::list_files(&config.download_dir)?
        .into_iter()
        .filter(|p| *p != marker && !config.files.keys().any(|name| PathBuf::from(name) == *p))
        .collect();

    Ok(VerifyReport {
        version: resolved.version,
        files,
        stray,
    })
}
