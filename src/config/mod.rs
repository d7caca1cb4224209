//! Configuration constants
//!
//! - [`defaults`] - Default values for optional settings
//! - [`urls`] - Upstream service URLs

pub mod defaults;
pub mod urls;
