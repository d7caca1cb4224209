//! Source rewrite engine
//!
//! Turns the raw text of an upstream test file into a file that runs
//! against the local harness. The engine is a pure function made of
//! ordered text passes:
//!
//! 1. Parent-directory imports become imports of the published package.
//! 2. The upstream setup module is replaced by the local one.
//! 3. The reporting hook is imported before the first import.
//! 4. Every `describe(` body gets a `beforeEach` calling the hook.
//! 5. Excluded tests have their `it(` rewritten to `it.skip(`.
//! 6. A provenance header is prepended.
//!
//! Later passes rely on the effects of earlier ones, and the header is added
//! last so no structural pass ever scans it.
//!
//! Nothing here parses the source. Passes locate markers by text offset, so
//! any pass that performs several insertions collects every offset first and
//! applies the edits from the highest offset to the lowest. An edit then only
//! shifts text that has already been handled.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::core::config::SyncConfig;
use crate::error::RewriteError;

/// Start of an import statement
const IMPORT_START: &str = "import ";

/// Start of a test declaration
const TEST_START: &str = "it(";

/// Skip form inserted between `it` and `(`
const SKIP_SUFFIX: &str = ".skip";

/// End of the line opening a suite body
const SUITE_BODY_OPENING: &str = "{\n";

fn parent_import_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"from '\.\.[./]*'|from "\.\.[./]*""#).expect("parent import pattern is valid")
    })
}

fn suite_start_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[ \t\n]describe\(").expect("suite pattern is valid"))
}

/// Rewrite one upstream file for the local harness.
///
/// # Arguments
/// * `config` - Sync configuration
/// * `download_url` - URL the text was fetched from; carries the version
/// * `file_name` - Upstream file name, used in errors and the header
/// * `source` - Raw upstream text
/// * `excluded_tests` - Names of tests to register as skipped
///
/// # Returns
/// The final file text, or a [`RewriteError`] when the configuration no
/// longer matches the upstream content.
pub fn rewrite(
    config: &SyncConfig,
    download_url: &str,
    file_name: &str,
    source: &str,
    excluded_tests: &[String],
) -> Result<String, RewriteError> {
    let header = provenance_header(config, download_url, file_name)?;
    let hook = &config.harness.hook_function;
    let setup_module = &config.custom_setup_module;

    let text = normalize_imports(source, &config.upstream.package);
    let text = text.replace(&config.upstream.setup_module, setup_module);
    let text = inject_hook_import(&text, hook, setup_module);
    let text = inject_suite_hooks(&text, hook, file_name)?;
    let text = skip_excluded_tests(&text, excluded_tests, file_name)?;

    tracing::debug!(
        "Rewrote {file_name}: {} -> {} bytes, {} test(s) skipped",
        source.len(),
        text.len(),
        excluded_tests.len()
    );
    Ok(header + &text)
}

/// Rewrite `from '..'`, `from '../../'` and the like to import `package`.
///
/// Only specifiers made entirely of dots and slashes after a leading `..`
/// are touched; `from '../util.js'` is left alone. The quote style is kept.
pub fn normalize_imports(source: &str, package: &str) -> String {
    parent_import_pattern()
        .replace_all(source, |caps: &Captures| {
            if caps[0].starts_with("from '") {
                format!("from '{package}'")
            } else {
                format!("from \"{package}\"")
            }
        })
        .into_owned()
}

/// Insert `import { hook } from 'module';` before the first import.
///
/// Text without any import is returned unchanged.
pub fn inject_hook_import(source: &str, hook: &str, module: &str) -> String {
    let Some(offset) = source.find(IMPORT_START) else {
        tracing::debug!("No import statement found, hook import not added");
        return source.to_string();
    };
    let mut text = String::with_capacity(source.len() + hook.len() + module.len() + 32);
    text.push_str(&source[..offset]);
    text.push_str(&format!("import {{ {hook} }} from '{module}';\n"));
    text.push_str(&source[offset..]);
    text
}

/// The `beforeEach` block injected at the top of a suite body
pub fn suite_hook_block(indent: &str, hook: &str) -> String {
    format!(
        "{indent}  beforeEach(function () {{\n\
         {indent}    {hook}(this);\n\
         {indent}  }});\n\n"
    )
}

/// Add a `beforeEach` calling `hook` to the start of every suite body.
///
/// A suite is `describe(` preceded by a space, tab, or newline. The block is
/// inserted right after the first `{` that ends a line at or after the
/// declaration and before the next suite, indented relative to the
/// declaration's line. A suite whose body opens on the same line as the
/// next declaration, or not at all, is an error. Suites whose body already
/// starts with the block are left as they are.
///
/// Offsets are all collected before any insertion, then used from last to
/// first. Applying them first to last would move every later suite.
pub fn inject_suite_hooks(
    source: &str,
    hook: &str,
    file_name: &str,
) -> Result<String, RewriteError> {
    let suite_starts: Vec<usize> = suite_start_pattern()
        .find_iter(source)
        .map(|m| m.start() + 1)
        .collect();

    let mut text = source.to_string();
    let mut injected = 0;
    for (i, &start) in suite_starts.iter().enumerate().rev() {
        let line_start = text[..start].rfind('\n').map_or(0, |i| i + 1);
        let indent: String = text[line_start..start]
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect();

        // Edits so far all lie after the next suite's start, so its
        // original offset still bounds this suite's declaration.
        let limit = suite_starts.get(i + 1).copied().unwrap_or(text.len());
        let body_start = text[start..limit]
            .find(SUITE_BODY_OPENING)
            .map(|i| start + i + SUITE_BODY_OPENING.len())
            .ok_or_else(|| RewriteError::SuiteBodyNotFound {
                file: file_name.to_string(),
                line: text[..start].matches('\n').count() + 1,
            })?;

        let block = suite_hook_block(&indent, hook);
        if text[body_start..].starts_with(&block) {
            continue;
        }
        text.insert_str(body_start, &block);
        injected += 1;
    }

    tracing::debug!(
        "{file_name}: {} suite(s) found, {injected} hook(s) injected",
        suite_starts.len()
    );
    Ok(text)
}

/// Rewrite the declaration of every excluded test to its skip form.
///
/// Each name is looked up in order of occurrence. An occurrence counts only
/// when the nearest `it(` above it is separated from it by nothing but
/// whitespace and quotes, and when the quote opening the name also closes
/// right after it. A name that merely appears inside another string, or is
/// a prefix or suffix of a longer test name, is passed over.
pub fn skip_excluded_tests(
    source: &str,
    excluded_tests: &[String],
    file_name: &str,
) -> Result<String, RewriteError> {
    let mut text = source.to_string();
    for test in excluded_tests {
        let marker = find_test_marker(&text, test).map_err(|found| {
            if found {
                RewriteError::TestStartNotFound {
                    test: test.clone(),
                    file: file_name.to_string(),
                }
            } else {
                RewriteError::TestNotFound {
                    test: test.clone(),
                    file: file_name.to_string(),
                }
            }
        })?;
        text.insert_str(marker + TEST_START.len() - 1, SKIP_SUFFIX);
        tracing::debug!("{file_name}: skipping '{test}'");
    }
    Ok(text)
}

/// Offset of the `it(` declaring `test`.
///
/// `Err(true)` means the name occurs but never as a declared test name,
/// `Err(false)` that it doesn't occur at all.
fn find_test_marker(text: &str, test: &str) -> Result<usize, bool> {
    let mut found = false;
    for (name_offset, _) in text.match_indices(test) {
        found = true;
        if let Some(marker) = marker_before(text, name_offset, test.len()) {
            return Ok(marker);
        }
    }
    Err(found)
}

fn marker_before(text: &str, name_offset: usize, name_len: usize) -> Option<usize> {
    let before = &text[..name_offset];
    let mut end = before.len();
    let marker = loop {
        let idx = before[..end].rfind(TEST_START)?;
        if is_standalone(before, idx) {
            break idx;
        }
        end = idx;
    };

    let gap = &before[marker + TEST_START.len()..];
    let qualifies =
        !gap.is_empty() && gap.chars().all(|c| c.is_whitespace() || is_quote(c));
    if !qualifies {
        return None;
    }

    // The literal must end where the name ends.
    let closed = match gap.chars().rev().find(|c| is_quote(*c)) {
        Some(quote) => text[name_offset + name_len..].starts_with(quote),
        None => true,
    };
    closed.then_some(marker)
}

fn is_quote(c: char) -> bool {
    matches!(c, '\'' | '"' | '`')
}

/// `it(` that isn't the tail of a longer identifier such as `wait(`
fn is_standalone(text: &str, idx: usize) -> bool {
    text[..idx]
        .chars()
        .next_back()
        .map_or(true, |c| !(c.is_alphanumeric() || c == '_' || c == '$'))
}

/// License line plus the ref-pinned URL of this exact file, then a blank line
pub fn provenance_header(
    config: &SyncConfig,
    download_url: &str,
    file_name: &str,
) -> Result<String, RewriteError> {
    let upstream = &config.upstream;
    let version = upstream
        .raw_url
        .extract_version(download_url)
        .ok_or_else(|| RewriteError::VersionNotInUrl {
            url: download_url.to_string(),
            template: upstream.raw_url.to_string(),
        })?;

    Ok(format!(
        "{}\n// {}{}{}\n\n",
        config.harness.header,
        upstream.ref_url.render(version),
        upstream.test_dir,
        file_name
    ))
}
