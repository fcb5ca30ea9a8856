//! Shared error types for covsan.
//!
//! The sanitizing core itself only fails on lifecycle misuse (e.g. a method
//! record arriving while no class is open). Everything else here belongs to
//! the shell: reading dumps, loading configuration, compiling path patterns.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SanitizeError {
    /// Analyzer callbacks arrived out of order
    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    /// File system related errors
    #[error("File system error: {message}: {}", .path.display())]
    FileSystem {
        message: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed analyzer or execution data dumps
    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Two probe arrays for the same class id disagree in length
    #[error("Incompatible execution data for class {name} with id {id}")]
    IncompatibleExecutionData { name: String, id: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Include/exclude pattern errors
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
}

impl SanitizeError {
    pub fn lifecycle(message: impl Into<String>) -> Self {
        Self::Lifecycle(message.into())
    }

    pub fn file_system(message: impl Into<String>, path: &Path, source: std::io::Error) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SanitizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_system_error_mentions_path() {
        let err = SanitizeError::file_system(
            "Unable to read execution data file",
            Path::new("target/jacoco.json"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        let text = err.to_string();
        assert!(text.contains("Unable to read execution data file"));
        assert!(text.contains("target/jacoco.json"));
    }

    #[test]
    fn test_lifecycle_error_display() {
        let err = SanitizeError::lifecycle("end_class called with no open class");
        assert_eq!(
            err.to_string(),
            "Lifecycle error: end_class called with no open class"
        );
    }
}
