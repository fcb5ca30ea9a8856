// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod coverage;
pub mod errors;
pub mod io;

// Re-export commonly used types
pub use crate::coverage::{
    BundleCoverage, ClassCoverage, ClassCoverageAccumulator, ClassDescriptor, ClassId,
    CoverageVisitor, ExecutionDataSource, FilterConfig, FilterKind, MethodCoverage,
    SanitizeListener, SanitizeOptions, SanitizingDriver, TracingListener,
};
pub use crate::errors::{Result, SanitizeError};
