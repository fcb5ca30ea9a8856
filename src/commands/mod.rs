//! CLI command implementations.
//!
//! - **sanitize**: sanitize analyzed classes and write a report
//! - **init**: write a default `.covsan.toml`

pub mod init;
pub mod sanitize;

pub use init::init_config;
pub use sanitize::{sanitize, sanitize_dump, SanitizeConfig, SanitizeOutcome, SanitizeSettings};
