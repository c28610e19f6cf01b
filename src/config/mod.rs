//! Configuration loading and layering.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Layer merging in [`merger`]
//!
//! # Example
//!
//! ```
//! use chroma_check::config::{load_config, ConfigOverlay};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("chroma-check.yml"), "port: 8100").unwrap();
//!
//! let config = load_config(None, temp.path(), ConfigOverlay::default()).unwrap();
//! assert_eq!(config.port, 8100);
//! assert_eq!(config.host, "127.0.0.1");
//! ```
//!
//! # Configuration Layers
//!
//! Later layers override earlier ones:
//! 1. Built-in defaults
//! 2. Config file (`--config`, or `chroma-check.yml` in the working directory)
//! 3. Environment variables (`CHROMA_CHECK_*`)
//! 4. Command-line flags

pub mod loader;
pub mod merger;
pub mod schema;

pub use loader::{
    check_data_dir, discover_config_file, load_config, load_overlay_file, parse_overlay,
    DEFAULT_CONFIG_FILE,
};
pub use merger::{apply_overlay, merge_layers};
pub use schema::{default_python, CheckConfig, ConfigOverlay};
