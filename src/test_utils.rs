//! Test utilities shared by unit tests
//!
//! Sample configuration plus proptest generators for upstream-style sources.

use std::collections::BTreeMap;
use std::path::Path;

use crate::core::config::SyncConfig;
use crate::core::url_template::UrlTemplate;

/// Config used by unit tests, pinned to version 0.27.2
pub const SAMPLE_CONFIG: &str = r#"
download_dir = "test/kysely"
custom_setup_module = "../setup/test-setup.js"

[upstream]
package = "kysely"
version = "0.27.2"
test_dir = "test/node/src/"
raw_url = "https://raw.githubusercontent.com/kysely-org/kysely/{version}/"
ref_url = "https://github.com/kysely-org/kysely/blob/{version}/"
tree_url = "https://github.com/kysely-org/kysely/tree/{version}"

[harness]
header = "// Copied from Kysely | MIT License"

[files]
"select.test.ts" = ["should select all columns"]
"#;

/// Parsed [`SAMPLE_CONFIG`]
pub fn sample_config() -> SyncConfig {
    SyncConfig::from_toml(SAMPLE_CONFIG, Path::new("testsync.toml"))
        .expect("sample config is valid")
}

/// Sample config pointed at another raw URL base and file table
pub fn config_with(raw_base: &str, files: BTreeMap<String, Vec<String>>) -> SyncConfig {
    let mut config = sample_config();
    config.upstream.raw_url =
        UrlTemplate::parse("upstream.raw_url", &format!("{raw_base}/{{version}}/"))
            .expect("test template is valid");
    config.files = files;
    config
}

/// Download URL of `file_name` for the sample config
pub fn sample_download_url(file_name: &str) -> String {
    let config = sample_config();
    format!(
        "{}{}{}",
        config.upstream.raw_url.render("0.27.2"),
        config.upstream.test_dir,
        file_name
    )
}

pub mod generators {
    use proptest::prelude::*;

    /// Import specifier climbing out of the current directory
    pub fn parent_specifier() -> impl Strategy<Value = String> {
        "\\.\\.[./]{0,6}"
    }

    /// A file of sibling suites, one per entry, indented by `depth * 2`
    pub fn suite_file(depths: &[usize]) -> String {
        let mut text = String::from("// generated\n");
        for (i, depth) in depths.iter().enumerate() {
            let indent = "  ".repeat(*depth);
            text.push_str(&format!(
                "\n{indent}describe('suite {i}', () => {{\n\
                 {indent}  it('test {i}', () => {{}})\n\
                 {indent}}})\n"
            ));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sample_config_parses() {
        let config = sample_config();
        assert_eq!(config.upstream.version.as_deref(), Some("0.27.2"));
    }

    #[test]
    fn test_sample_download_url() {
        assert_eq!(
            sample_download_url("a.test.ts"),
            "https://raw.githubusercontent.com/kysely-org/kysely/0.27.2/test/node/src/a.test.ts"
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_parent_specifier_generator(spec in parent_specifier()) {
            prop_assert!(spec.starts_with(".."));
            prop_assert!(spec.chars().all(|c| c == '.' || c == '/'));
        }
    }
}
