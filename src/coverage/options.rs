use super::filters::FilterConfig;

/// Source extension of the language whose compiler emits the synthetic names.
pub const DEFAULT_SOURCE_EXTENSION: &str = ".scala";

/// Everything the finalize step needs besides the buffered records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizeOptions {
    pub filters: FilterConfig,
    /// Classes compiled from files with this extension get the synthetic-name rule
    pub source_extension: String,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            filters: FilterConfig::none(),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
        }
    }
}

impl SanitizeOptions {
    pub fn with_filters(filters: FilterConfig) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }
}

/// Plain reports get baseline sanitization only; filtered reports add the
/// configured filters. Both go through the same driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportMode {
    Plain,
    Filtered(FilterConfig),
}

impl ReportMode {
    /// Filtered when any filter is configured.
    pub fn from_filters(filters: FilterConfig) -> Self {
        if filters.is_empty() {
            ReportMode::Plain
        } else {
            ReportMode::Filtered(filters)
        }
    }

    pub fn options(&self, source_extension: &str) -> SanitizeOptions {
        let filters = match self {
            ReportMode::Plain => FilterConfig::none(),
            ReportMode::Filtered(filters) => filters.clone(),
        };
        SanitizeOptions {
            filters,
            source_extension: source_extension.to_string(),
        }
    }
}
