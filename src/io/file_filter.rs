//! Include/exclude filtering of class file locations.
//!
//! Patterns are Ant style: `*` stays within one path segment, `**` spans
//! any number of directories.

use crate::errors::Result;
use glob::{MatchOptions, Pattern};

/// Default include pattern: every class file.
pub const INCLUDE_ALL: &str = "**";

#[derive(Debug, Clone)]
pub struct FileFilter {
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
}

impl FileFilter {
    /// Compile patterns; an empty include list means "everything".
    pub fn new(includes: &[String], excludes: &[String]) -> Result<Self> {
        let includes = if includes.is_empty() {
            vec![Pattern::new(INCLUDE_ALL)?]
        } else {
            compile(includes)?
        };
        Ok(Self {
            includes,
            excludes: compile(excludes)?,
        })
    }

    pub fn matches(&self, location: &str) -> bool {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        self.includes
            .iter()
            .any(|p| p.matches_with(location, options))
            && !self
                .excludes
                .iter()
                .any(|p| p.matches_with(location, options))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(Into::into))
        .collect()
}
