//! # Storage Layer
//!
//! Loading of map files and configuration from disk.
//!
//! ## Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Maps | Text grid, one row per line | any path given on the command line |
//! | Config | TOML | `--config`, `./hexpath.toml` or the user config dir |
//!
//! ## Key Types
//!
//! - [`map_file`] - Parse a map file into a [`HexMap`](crate::domain::HexMap)
//! - [`Config`] - Search and output settings

pub mod map_file;
mod config;

pub use config::{Config, ConfigError, OutputConfig, OutputFormat, SearchConfig, LOCAL_CONFIG};
pub use map_file::MapError;
