//! testsync - keep a local copy of an upstream test suite in sync
//!
//! Downloads upstream test files and rewrites them so they run unmodified
//! against a local test harness, with provenance headers and per-test
//! exclusions.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Config, version resolution, the rewrite engine, and sync logic
//! - [`infra`] - Infrastructure layer (network, filesystem)
//! - [`config`] - Configuration constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
