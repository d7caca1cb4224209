//! Error types for testsync
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found at '{path}'")]
    NotFound { path: PathBuf },

    /// Config file could not be read
    #[error("Failed to read config file '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Config file is not valid TOML for the expected shape
    #[error("Failed to parse config file '{path}': {error}")]
    Parse { path: PathBuf, error: String },

    /// Missing required field
    #[error("Config file doesn't provide '{field}'")]
    MissingField { field: String },

    /// No files to sync
    #[error("Config file lists no files under 'files'")]
    EmptyFileTable,

    /// The same test is excluded twice for one file
    #[error("Test '{test}' is excluded more than once for {file}")]
    DuplicateExclusion { file: String, test: String },

    /// Blank test name in an exclusion list
    #[error("Blank test name excluded for {file}")]
    EmptyTestName { file: String },

    /// URL template without a usable `{version}` placeholder
    #[error("Invalid URL template for '{field}': {reason}")]
    InvalidTemplate { field: String, reason: String },
}

/// Errors raised by the source rewrite engine
#[derive(Error, Debug, PartialEq)]
pub enum RewriteError {
    /// Excluded test name does not occur in the file
    #[error("Test '{test}' not found in {file}")]
    TestNotFound { test: String, file: String },

    /// Excluded test name occurs, but never directly after a test marker
    #[error("Start of test '{test}' not found in {file}")]
    TestStartNotFound { test: String, file: String },

    /// Suite declaration without an opening body brace after it
    #[error("Body of suite declared on line {line} not found in {file}")]
    SuiteBodyNotFound { file: String, line: usize },

    /// Download URL doesn't carry a version in the expected place
    #[error("Cannot extract version from '{url}' using template '{template}'")]
    VersionNotInUrl { url: String, template: String },
}

/// Download errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Network error
    #[error("Network error downloading '{url}': {error}")]
    NetworkError { url: String, error: String },

    /// Non-success HTTP status
    #[error("Failed to load {url}: {status}")]
    HttpStatus { url: String, status: String },

    /// Response body could not be decoded
    #[error("Invalid response from '{url}': {error}")]
    InvalidBody { url: String, error: String },
}

/// Upstream version resolution errors
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Tag listing could not be fetched
    #[error("Failed to list upstream tags: {0}")]
    Tags(#[from] DownloadError),

    /// Neither a pinned version nor a tag listing is configured
    #[error("No upstream version pinned and no tag listing configured")]
    NoTagSource,

    /// No tag parses as a semver version
    #[error("No semver tags found at '{url}'")]
    NoVersionTags { url: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },
}

/// Top-level testsync error type
#[derive(Error, Debug)]
pub enum SyncError {
    /// Config error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Rewrite error
    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    /// Download error
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Version resolution error
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),
}

impl SyncError {
    /// Whether this error means the configuration disagrees with upstream.
    ///
    /// These are reported as a plain message with exit status 1. Anything
    /// else (I/O failures, transport errors) is treated as unexpected.
    pub fn is_config_error(&self) -> bool {
        match self {
            Self::Config(_) | Self::Rewrite(_) => true,
            Self::Resolve(ResolveError::Tags(e)) | Self::Download(e) => {
                matches!(e, DownloadError::HttpStatus { .. })
            }
            Self::Resolve(_) => true,
            Self::Filesystem(_) => false,
        }
    }
}
