use crate::coverage::{FilterConfig, DEFAULT_SOURCE_EXTENSION};
use crate::io::ReportFormat;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".covsan.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: Option<ReportFormat>,
}

/// Contents of `.covsan.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CovsanConfig {
    /// Filter identifiers, e.g. `["MIXIN", "CASE"]`
    #[serde(default)]
    pub filters: Vec<String>,

    /// Class file patterns to include (all classes when empty)
    #[serde(default)]
    pub includes: Vec<String>,

    #[serde(default)]
    pub excludes: Vec<String>,

    #[serde(default)]
    pub source_extension: Option<String>,

    #[serde(default)]
    pub skip: bool,

    #[serde(default)]
    pub output: OutputConfig,
}

impl CovsanConfig {
    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig::from_identifiers(&self.filters)
    }

    pub fn source_extension(&self) -> &str {
        self.source_extension
            .as_deref()
            .unwrap_or(DEFAULT_SOURCE_EXTENSION)
    }

    pub fn output_format(&self) -> ReportFormat {
        self.output.format.unwrap_or_default()
    }
}
