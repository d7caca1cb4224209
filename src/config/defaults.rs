//! Default configuration values

/// Config file looked up when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "testsync.toml";

/// Upstream's own test setup module, replaced by the local one
pub const DEFAULT_UPSTREAM_SETUP_MODULE: &str = "./test-setup.js";

/// Function the injected `beforeEach` hook calls with the test context
pub const DEFAULT_HOOK_FUNCTION: &str = "reportMochaContext";

/// Maximum number of download attempts per URL
pub const MAX_DOWNLOAD_RETRIES: u32 = 3;

/// Base delay for exponential backoff between attempts (in milliseconds)
pub const RETRY_BASE_DELAY_MS: u64 = 500;

/// Upper bound on total retry time for one URL (in seconds)
pub const RETRY_MAX_ELAPSED_SECS: u64 = 60;

/// Per-request timeout (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Connect timeout (in seconds)
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default number of files fetched concurrently
pub const DEFAULT_PARALLEL_DOWNLOADS: usize = 1;
