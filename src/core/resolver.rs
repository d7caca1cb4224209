//! Upstream version resolution
//!
//! Picks the upstream tag to sync from (pinned in config, overridden on the
//! command line, or the newest semver tag upstream) and renders the base
//! download URL for it.

use semver::Version;
use serde::Deserialize;

use crate::core::config::SyncConfig;
use crate::error::ResolveError;
use crate::infra::download::DownloadManager;

/// A resolved upstream version and the download base URL built from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    /// Tag exactly as upstream spells it (e.g. `v0.27.2` or `0.27.2`)
    pub version: String,
    /// Raw download base for that tag, ending in `/`
    pub base_url: String,
}

impl ResolvedVersion {
    /// Build from a known tag
    pub fn pinned(config: &SyncConfig, version: &str) -> Self {
        Self {
            version: version.to_string(),
            base_url: config.upstream.raw_url.render(version),
        }
    }

    /// Download URL of one upstream test file
    pub fn file_url(&self, config: &SyncConfig, file_name: &str) -> String {
        format!("{}{}{}", self.base_url, config.upstream.test_dir, file_name)
    }
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

/// Resolve the version to sync.
///
/// `version_override` wins over the configured pin; without either, the tag
/// listing is queried.
pub async fn resolve_version(
    config: &SyncConfig,
    downloader: &DownloadManager,
    version_override: Option<&str>,
) -> Result<ResolvedVersion, ResolveError> {
    if let Some(version) = version_override.or(config.upstream.version.as_deref()) {
        tracing::debug!("Using pinned upstream version {version}");
        return Ok(ResolvedVersion::pinned(config, version));
    }

    let tags_url = config
        .upstream
        .tags_url
        .as_deref()
        .ok_or(ResolveError::NoTagSource)?;
    tracing::info!("Looking up latest upstream tag at {tags_url}");

    let tags: Vec<TagEntry> = downloader.fetch_json(tags_url).await?;
    let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    let latest = latest_tag(&names).ok_or_else(|| ResolveError::NoVersionTags {
        url: tags_url.to_string(),
    })?;

    tracing::info!("Latest upstream tag is {latest}");
    Ok(ResolvedVersion::pinned(config, latest))
}

/// Parse a tag as semver, allowing a leading `v`
pub fn parse_tag(tag: &str) -> Option<Version> {
    Version::parse(tag.strip_prefix('v').unwrap_or(tag)).ok()
}

/// Highest semver tag, preferring releases over pre-releases.
///
/// Tags that aren't semver are ignored.
pub fn latest_tag<'a>(tags: &[&'a str]) -> Option<&'a str> {
    let parsed: Vec<(Version, &str)> = tags
        .iter()
        .filter_map(|tag| parse_tag(tag).map(|v| (v, *tag)))
        .collect();

    let newest = |pre: bool| {
        parsed
            .iter()
            .filter(|(v, _)| v.pre.is_empty() != pre)
            .max_by(|a, b| a.0.cmp(&b.0))
            .map(|(_, tag)| *tag)
    };
    newest(false).or_else(|| newest(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_config;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_latest_tag_picks_highest_semver() {
        let tags = ["0.26.3", "v0.27.2", "0.27.10", "main", "0.9.0"];
        assert_eq!(latest_tag(&tags), Some("0.27.10"));
    }

    #[test]
    fn test_latest_tag_prefers_releases() {
        let tags = ["0.28.0-rc.1", "0.27.2"];
        assert_eq!(latest_tag(&tags), Some("0.27.2"));
    }

    #[test]
    fn test_latest_tag_falls_back_to_prerelease() {
        let tags = ["1.0.0-beta.1", "1.0.0-beta.2", "nightly"];
        assert_eq!(latest_tag(&tags), Some("1.0.0-beta.2"));
    }

    #[test]
    fn test_latest_tag_none() {
        assert_eq!(latest_tag(&["main", "release"]), None);
        assert_eq!(latest_tag(&[]), None);
    }

    #[test]
    fn test_parse_tag_strips_v() {
        assert_eq!(parse_tag("v1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(parse_tag("1.2"), None);
    }

    #[test]
    fn test_file_url() {
        let config = sample_config();
        let resolved = ResolvedVersion::pinned(&config, "0.27.2");
        assert_eq!(
            resolved.file_url(&config, "select.test.ts"),
            "https://raw.githubusercontent.com/kysely-org/kysely/0.27.2/test/node/src/select.test.ts"
        );
    }

    #[tokio::test]
    async fn test_resolve_pinned_makes_no_request() {
        let config = sample_config();
        let resolved = resolve_version(&config, &DownloadManager::with_config(1, 10), None)
            .await
            .unwrap();
        assert_eq!(resolved.version, "0.27.2");
        assert_eq!(
            resolved.base_url,
            "https://raw.githubusercontent.com/kysely-org/kysely/0.27.2/"
        );
    }

    #[tokio::test]
    async fn test_resolve_override_wins() {
        let config = sample_config();
        let resolved =
            resolve_version(&config, &DownloadManager::with_config(1, 10), Some("v0.26.0"))
                .await
                .unwrap();
        assert_eq!(resolved.version, "v0.26.0");
    }

    #[tokio::test]
    async fn test_resolve_latest_from_tags() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/kysely-org/kysely/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"name":"0.27.3"},{"name":"0.27.2"},{"name":"0.28.0-beta.1"}]"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut config = sample_config();
        config.upstream.version = None;
        config.upstream.tags_url = Some(format!("{}/repos/kysely-org/kysely/tags", mock_server.uri()));

        let resolved = resolve_version(&config, &DownloadManager::with_config(1, 10), None)
            .await
            .unwrap();
        assert_eq!(resolved.version, "0.27.3");
        assert_eq!(
            resolved.base_url,
            "https://raw.githubusercontent.com/kysely-org/kysely/0.27.3/"
        );
    }

    #[tokio::test]
    async fn test_resolve_without_semver_tags() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"[{"name":"main"}]"#))
            .mount(&mock_server)
            .await;

        let mut config = sample_config();
        config.upstream.version = None;
        config.upstream.tags_url = Some(format!("{}/tags", mock_server.uri()));

        let err = resolve_version(&config, &DownloadManager::with_config(1, 10), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::NoVersionTags { .. }));
    }

    #[tokio::test]
    async fn test_resolve_without_tag_source() {
        let mut config = sample_config();
        config.upstream.version = None;
        config.upstream.tags_url = None;
        let err = resolve_version(&config, &DownloadManager::with_config(1, 10), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::NoTagSource));
    }
}
