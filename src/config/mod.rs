//! `.covsan.toml` configuration.

pub mod core;
pub mod loader;

pub use self::core::{CovsanConfig, OutputConfig, CONFIG_FILE_NAME};
pub use loader::{directory_ancestors, find_config, load_config, load_config_from, parse_config};
