//! Version marker file
//!
//! One small text file per sync run records which upstream tag the local
//! copy came from:
//!
//! ```text
//! kysely version: 0.27.2
//! https://github.com/kysely-org/kysely/tree/0.27.2
//! ```

use crate::core::config::SyncConfig;

/// Contents of the version marker file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMarker {
    /// Label before the version (e.g. `kysely version`)
    pub label: String,
    /// Upstream tag
    pub version: String,
    /// Browsable source tree at that tag
    pub tree_url: String,
}

impl VersionMarker {
    /// Marker for `version` using the configured label and tree URL
    pub fn new(config: &SyncConfig, version: &str) -> Self {
        Self {
            label: config.harness.version_label.clone(),
            version: version.to_string(),
            tree_url: config.upstream.tree_url.render(version),
        }
    }

    /// Marker file text: two lines, no trailing newline
    pub fn render(&self) -> String {
        format!("{}: {}\n{}", self.label, self.version, self.tree_url)
    }

    /// Read a marker back from file text
    pub fn parse(text: &str) -> Option<Self> {
        let mut lines = text.lines();
        let (label, version) = lines.next()?.split_once(": ")?;
        let tree_url = lines.next()?.trim();
        if version.trim().is_empty() {
            return None;
        }
        Some(Self {
            label: label.to_string(),
            version: version.trim().to_string(),
            tree_url: tree_url.to_string(),
        })
    }
}
