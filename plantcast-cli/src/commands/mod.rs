//! CLI command implementations.

pub mod config;
pub mod forecast;
pub mod plants;
pub mod watch;
