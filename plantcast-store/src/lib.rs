// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Plantcast Store
//!
//! Configuration persistence for Plantcast.
//!
//! This crate provides:
//!
//! - **Config**: API endpoint, fetch tuning and the plant catalog
//! - **Persistence**: JSON file helpers with atomic writes and owner-only
//!   permissions
//!
//! Credentials are never stored here.
//!
//! ## Usage
//!
//! ```ignore
//! use plantcast_store::Config;
//!
//! let config = Config::load_from(&Config::default_path()).await?;
//! let settings = config.fetch_settings();
//! ```

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{ApiConfig, Config, FetchConfig, LogLevel};
pub use error::StoreError;
pub use persistence::{default_config_dir, default_config_path, ensure_dir, load_json, save_json};
