//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

use std::path::{Path, PathBuf};
use std::process::Output;

use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Upstream files served by the mock server, as listed in the fixture config
#[allow(dead_code)]
pub const UPSTREAM_FILES: [&str; 3] = ["sanity.test.ts", "select.test.ts", "where.test.ts"];

/// Placeholder for the mock server address in the fixture config
const SERVER_PLACEHOLDER: &str = "@SERVER@";

/// Path of a file under `tests/fixtures`
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Read a fixture file
pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("Failed to read fixture")
}

/// Test project context
///
/// A temporary directory holding a `testsync.toml` and, after a sync, the
/// downloaded tests under `kysely/`.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test project directory
    #[allow(dead_code)]
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Path of the project's config file
    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("testsync.toml")
    }

    /// Directory the sync writes into
    #[allow(dead_code)]
    pub fn download_dir(&self) -> PathBuf {
        self.dir.path().join("kysely")
    }

    /// Write the fixture config with raw downloads pointed at `server`
    pub fn write_config(&self, server: &str) {
        let config = fixture("testsync.toml").replace(SERVER_PLACEHOLDER, server);
        self.create_file("testsync.toml", &config);
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Check if a file exists in the test project
    #[allow(dead_code)]
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    #[allow(dead_code)]
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Run the testsync binary against this project's config
    pub async fn run(&self, args: &[&str]) -> Output {
        tokio::process::Command::new(env!("CARGO_BIN_EXE_testsync"))
            .arg("--config")
            .arg(self.config_path())
            .args(args)
            .current_dir(self.dir.path())
            .env_remove("TESTSYNC_CONFIG")
            .env_remove("RUST_LOG")
            .output()
            .await
            .expect("Failed to run testsync")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Serve every upstream fixture at its raw path for tag 0.27.2
#[allow(dead_code)]
pub async fn serve_upstream(server: &MockServer) {
    for name in UPSTREAM_FILES {
        Mock::given(method("GET"))
            .and(path(format!("/kysely-org/kysely/0.27.2/test/node/src/{name}")))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(fixture(&format!("upstream/{name}"))),
            )
            .mount(server)
            .await;
    }
}

/// Sorted relative paths of all files below `dir`
#[allow(dead_code)]
pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.path().strip_prefix(dir).ok().map(Path::to_path_buf))
        .collect();
    files.sort();
    files
}

/// Stdout of a finished command as text
#[allow(dead_code)]
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr of a finished command as text
#[allow(dead_code)]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
