//! URL templates with a named version segment
//!
//! Upstream URLs embed the resolved tag as one path segment. Rather than
//! recovering it by splitting on `/` and counting, every URL shape is
//! described by a template such as
//! `https://raw.githubusercontent.com/kysely-org/kysely/{version}/`, which is
//! used both to render URLs and to read the version back out of them.

use regex::Regex;

use crate::error::ConfigError;

/// Placeholder marking the version segment
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// A URL template containing exactly one `{version}` placeholder
#[derive(Debug, Clone)]
pub struct UrlTemplate {
    template: String,
    pattern: Regex,
}

impl UrlTemplate {
    /// Parse a template, naming the config `field` it came from in errors
    pub fn parse(field: &str, template: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidTemplate {
            field: field.to_string(),
            reason: reason.to_string(),
        };

        if template.matches(VERSION_PLACEHOLDER).count() != 1 {
            return Err(invalid("expected exactly one {version} placeholder"));
        }
        let Some((prefix, suffix)) = template.split_once(VERSION_PLACEHOLDER) else {
            return Err(invalid("expected exactly one {version} placeholder"));
        };
        if prefix.is_empty() {
            return Err(invalid("{version} cannot start the template"));
        }

        let pattern = Regex::new(&format!(
            "^{}(?P<version>[^/?#]+){}",
            regex::escape(prefix),
            regex::escape(suffix)
        ))
        .map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            template: template.to_string(),
            pattern,
        })
    }

    /// Substitute `version` into the template
    pub fn render(&self, version: &str) -> String {
        self.template.replacen(VERSION_PLACEHOLDER, version, 1)
    }

    /// Read the version segment back out of a URL rendered from this template.
    ///
    /// The URL may continue past the end of the template (a file path
    /// appended to a base URL, for instance).
    pub fn extract_version<'a>(&self, url: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(url)
            .and_then(|caps| caps.name("version"))
            .map(|m| m.as_str())
    }

    /// The raw template text
    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl PartialEq for UrlTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.template == other.template
    }
}

impl Eq for UrlTemplate {}

impl std::fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.template)
    }
}
