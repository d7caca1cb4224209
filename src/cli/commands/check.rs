//! Check command implementation
//!
//! Implements `testsync check` to validate the config file offline.

use std::path::Path;

use crate::cli::output::status;
use crate::core::config::SyncConfig;

/// Execute the check command.
///
/// Loading already validated the config; this prints what it describes.
pub fn execute(config: &SyncConfig, config_path: &Path, quiet: bool) {
    tracing::info!("Checked config at {}", config_path.display());
    if quiet {
        return;
    }

    let upstream = &config.upstream;
    println!("{} Config is valid: {}", status::SUCCESS, config_path.display());
    println!("  Download dir: {}", config.download_dir.display());
    println!(
        "  Upstream:     {} @ {}",
        upstream.package,
        upstream.version.as_deref().unwrap_or("latest tag")
    );
    println!("  Setup module: {}", config.custom_setup_module);
    println!(
        "  Files:        {} ({} excluded test(s))",
        config.files.len(),
        config.excluded_count()
    );
    for (name, excluded) in &config.files {
        if excluded.is_empty() {
            println!("    {name}");
        } else {
            println!("    {name} ({} excluded)", excluded.len());
        }
    }
}
