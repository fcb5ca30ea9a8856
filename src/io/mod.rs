//! Reading analyzer and execution dumps, selecting classes, writing reports.

pub mod file_filter;
pub mod input;
pub mod output;
pub mod writers;

pub use file_filter::FileFilter;
pub use input::{AnalysisDump, ClassDump, ExecutionData, ExecutionDataStore, SessionInfo};
pub use output::{create_writer, CoverageReport, ReportFormat, ReportWriter};
