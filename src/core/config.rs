//! Sync configuration (testsync.toml) parsing and validation
//!
//! The config file names the upstream files to copy, the tests to skip in
//! each, and how upstream URLs are built. It is loaded once per run and is
//! immutable afterwards.
//!
//! ```toml
//! download_dir = "test/upstream"
//! custom_setup_module = "../setup/test-setup.js"
//!
//! [upstream]
//! package = "kysely"
//! repo = "kysely-org/kysely"
//! test_dir = "test/node/src/"
//! raw_url = "https://raw.githubusercontent.com/kysely-org/kysely/{version}/"
//! ref_url = "https://github.com/kysely-org/kysely/blob/{version}/"
//! tree_url = "https://github.com/kysely-org/kysely/tree/{version}"
//!
//! [harness]
//! header = "// Copied from Kysely | MIT License"
//!
//! [files]
//! "select.test.ts" = ["should select one column"]
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::{defaults, urls};
use crate::core::url_template::UrlTemplate;
use crate::error::ConfigError;

/// Validated sync configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    /// Directory the rewritten files are written to
    pub download_dir: PathBuf,

    /// Module path substituted for the upstream setup module
    pub custom_setup_module: String,

    /// Where upstream files come from
    pub upstream: UpstreamConfig,

    /// What the local harness expects
    pub harness: HarnessConfig,

    /// Upstream file name → names of tests to skip
    pub files: BTreeMap<String, Vec<String>>,
}

/// Upstream source settings
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamConfig {
    /// Published package name relative parent imports are rewritten to
    pub package: String,

    /// Path of the test directory within the upstream tree, with trailing `/`
    pub test_dir: String,

    /// Upstream's own setup module path
    pub setup_module: String,

    /// Pinned tag; `None` means the latest tag
    pub version: Option<String>,

    /// Raw file download base
    pub raw_url: UrlTemplate,

    /// Browsable, ref-pinned file URL base used in provenance headers
    pub ref_url: UrlTemplate,

    /// Browsable source tree URL written to the version marker
    pub tree_url: UrlTemplate,

    /// Tag listing endpoint, needed only when no version is pinned
    pub tags_url: Option<String>,
}

/// Local harness settings
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    /// License/attribution comment placed first in every file
    pub header: String,

    /// Reporting function called from each injected `beforeEach`
    pub hook_function: String,

    /// File name of the version marker
    pub version_file: String,

    /// Label preceding the version in the marker
    pub version_label: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    download_dir: Option<PathBuf>,
    custom_setup_module: Option<String>,
    #[serde(default)]
    upstream: RawUpstream,
    #[serde(default)]
    harness: RawHarness,
    files: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawUpstream {
    package: Option<String>,
    repo: Option<String>,
    test_dir: Option<String>,
    setup_module: Option<String>,
    version: Option<String>,
    raw_url: Option<String>,
    ref_url: Option<String>,
    tree_url: Option<String>,
    tags_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawHarness {
    header: Option<String>,
    hook_function: Option<String>,
    version_file: Option<String>,
    version_label: Option<String>,
}

fn required(value: Option<String>, field: &str) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingField {
            field: field.to_string(),
        }),
    }
}

/// `value` if set and non-blank, `default` if absent
fn or_default(
    value: Option<String>,
    field: &str,
    default: impl FnOnce() -> String,
) -> Result<String, ConfigError> {
    match value {
        None => Ok(default()),
        set => required(set, field),
    }
}

fn template(value: Option<String>, field: &str) -> Result<UrlTemplate, ConfigError> {
    UrlTemplate::parse(field, &required(value, field)?)
}

impl SyncConfig {
    /// Parse and validate config from TOML text.
    ///
    /// Relative `download_dir` values are kept as written; [`SyncConfig::load`]
    /// resolves them against the config file's directory.
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.message().to_string(),
        })?;
        Self::validate(raw)
    }

    /// Read, parse, and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let mut config = Self::from_toml(&content, path)?;
        if config.download_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.download_dir = parent.join(&config.download_dir);
            }
        }
        tracing::debug!(
            "Loaded config from {} ({} files)",
            path.display(),
            config.files.len()
        );
        Ok(config)
    }

    fn validate(raw: RawConfig) -> Result<Self, ConfigError> {
        // Files are checked first: an empty sync is the most basic mistake.
        let files = raw.files.ok_or_else(|| ConfigError::MissingField {
            field: "files".to_string(),
        })?;
        if files.is_empty() {
            return Err(ConfigError::EmptyFileTable);
        }
        for (file, tests) in &files {
            let mut seen = HashSet::new();
            for test in tests {
                if test.trim().is_empty() {
                    return Err(ConfigError::EmptyTestName { file: file.clone() });
                }
                if !seen.insert(test.as_str()) {
                    return Err(ConfigError::DuplicateExclusion {
                        file: file.clone(),
                        test: test.clone(),
                    });
                }
            }
        }

        let download_dir = raw
            .download_dir
            .filter(|d| !d.as_os_str().is_empty())
            .ok_or_else(|| ConfigError::MissingField {
                field: "download_dir".to_string(),
            })?;
        let custom_setup_module = required(raw.custom_setup_module, "custom_setup_module")?;

        let up = raw.upstream;
        let package = required(up.package, "upstream.package")?;
        let mut test_dir = required(up.test_dir, "upstream.test_dir")?;
        if !test_dir.ends_with('/') {
            test_dir.push('/');
        }
        let version = up.version.filter(|v| !v.trim().is_empty());
        let tags_url = up
            .tags_url
            .or_else(|| up.repo.as_deref().map(urls::github_tags_url));
        if version.is_none() && tags_url.is_none() {
            return Err(ConfigError::MissingField {
                field: "upstream.version, upstream.tags_url or upstream.repo".to_string(),
            });
        }
        let upstream = UpstreamConfig {
            test_dir,
            setup_module: or_default(up.setup_module, "upstream.setup_module", || {
                defaults::DEFAULT_UPSTREAM_SETUP_MODULE.to_string()
            })?,
            version,
            raw_url: template(up.raw_url, "upstream.raw_url")?,
            ref_url: template(up.ref_url, "upstream.ref_url")?,
            tree_url: template(up.tree_url, "upstream.tree_url")?,
            tags_url,
            package,
        };

        let h = raw.harness;
        let harness = HarnessConfig {
            header: required(h.header, "harness.header")?,
            hook_function: or_default(h.hook_function, "harness.hook_function", || {
                defaults::DEFAULT_HOOK_FUNCTION.to_string()
            })?,
            version_file: or_default(h.version_file, "harness.version_file", || {
                format!("_{}-version.txt", upstream.package)
            })?,
            version_label: h
                .version_label
                .unwrap_or_else(|| format!("{} version", upstream.package)),
        };

        Ok(Self {
            download_dir,
            custom_setup_module,
            upstream,
            harness,
            files,
        })
    }

    /// Excluded tests configured for `file_name`, empty when not configured
    pub fn excluded_tests(&self, file_name: &str) -> &[String] {
        self.files
            .get(file_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of excluded tests across all files
    pub fn excluded_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }
}
