//! CLI implementation for `testsync rewrite` command
//!
//! Applies the rewrite engine to a file already on disk, which helps when
//! updating exclusion lists against a new upstream release.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::core::config::SyncConfig;
use crate::core::resolver::ResolvedVersion;
use crate::core::rewrite::rewrite;
use crate::error::SyncError;
use crate::infra::filesystem;

/// Execute the rewrite command
pub fn execute(
    config: &SyncConfig,
    file: &Path,
    name: Option<String>,
    tag: Option<String>,
    output: Option<&Path>,
) -> Result<()> {
    let name = match name {
        Some(name) => name,
        None => file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("No file name in '{}'", file.display()))?,
    };
    let Some(version) = tag.or_else(|| config.upstream.version.clone()) else {
        bail!("No upstream version pinned in the config; pass --tag");
    };
    if !config.files.contains_key(&name) {
        tracing::warn!("'{name}' is not listed in the config; no tests will be skipped");
    }

    let source = filesystem::read_file(file).map_err(SyncError::from)?;
    let url = ResolvedVersion::pinned(config, &version).file_url(config, &name);
    let text = rewrite(config, &url, &name, &source, config.excluded_tests(&name))
        .map_err(SyncError::from)?;

    match output {
        Some(path) => filesystem::write_file(path, &text).map_err(SyncError::from)?,
        None => print!("{text}"),
    }
    Ok(())
}
