//! Output formatting and progress indicators
//!
//! This module provides utilities for displaying progress spinners
//! and formatted messages to the user.

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::SyncError;

/// Create a spinner for operations with unknown duration
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.blue} {msg}")
            .expect("Invalid spinner template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Spinner that stays hidden when `quiet` is set
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        ProgressBar::hidden()
    } else {
        create_spinner(message)
    }
}

/// Whether an error is a configuration/upstream mismatch.
///
/// Such errors are shown as a plain message instead of an error chain.
pub fn is_config_error(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<SyncError>()
        .is_some_and(SyncError::is_config_error)
}

/// Message printed for configuration errors
pub fn format_config_error(error: &anyhow::Error) -> String {
    format!("Failed to sync upstream tests\n{error}\n")
}

/// Print a configuration error to stderr
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{}", format_config_error(error));
}

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";
}
