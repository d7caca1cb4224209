//! Core sync logic
//!
//! The rewrite engine in [`rewrite`] is pure; the remaining modules drive
//! it, doing their I/O through [`crate::infra`].
//!
//! # Submodules
//!
//! - [`config`] - Config file (testsync.toml) parsing and validation
//! - [`url_template`] - URL templates with a named version segment
//! - [`resolver`] - Upstream version resolution
//! - [`rewrite`] - Source rewrite engine
//! - [`sync`] - Fetch, rewrite and write orchestration
//! - [`verify`] - Drift detection for a synced directory
//! - [`version`] - Version marker file

pub mod config;
pub mod resolver;
pub mod rewrite;
pub mod sync;
pub mod url_template;
pub mod verify;
pub mod version;
