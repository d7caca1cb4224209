//! Infrastructure layer
//!
//! Handles all I/O operations: network and filesystem.

pub mod download;
pub mod filesystem;
