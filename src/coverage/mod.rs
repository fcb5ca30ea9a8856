//! Coverage sanitization for compiler-synthesized methods.
//!
//! A compiler such as scalac expands one source declaration into several JVM
//! methods: trait forwarders, case class helpers, default-argument accessors.
//! Reported as-is they double count lines and show mechanical code as
//! untested. This module decides which per-method records survive.
//!
//! # Module Structure
//!
//! - [`types`] - Core data structures (pure data)
//! - [`classifiers`] - Synthetic method predicates (pure functions)
//! - [`filters`] - Composable kept-set filters (pure functions)
//! - [`options`] - Filter configuration and report modes
//! - [`accumulator`] - Per-class buffering and finalize
//! - [`listener`] - Observation hooks for a run
//! - [`driver`] - Analyzer-facing lifecycle (imperative shell)
//! - [`bundle`] - Report-wide aggregation
//!
//! # Architecture
//!
//! ```text
//!                  types.rs (foundation)
//!                     ↑
//!               classifiers.rs
//!                     ↑
//!       options.rs → filters.rs
//!                     ↑
//!              accumulator.rs
//!                     ↑
//!   listener.rs → driver.rs → bundle.rs (CoverageVisitor)
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use covsan::coverage::{
//!     BundleCoverage, ClassDescriptor, FilterConfig, SanitizeOptions, SanitizingDriver,
//!     TracingListener,
//! };
//!
//! let options = SanitizeOptions::with_filters(FilterConfig::from_identifiers(["MIXIN", "CASE"]));
//! let mut driver = SanitizingDriver::new(&exec_data, options, BundleCoverage::new("app"), TracingListener);
//! driver.analyze_class(ClassDescriptor::new("com/example/Shape", id, Some("Shape.scala")), methods)?;
//! let (bundle, _) = driver.finish()?;
//! ```

pub mod accumulator;
pub mod bundle;
pub mod classifiers;
pub mod driver;
pub mod filters;
pub mod listener;
pub mod options;
pub mod types;

pub use accumulator::{ClassCoverageAccumulator, FinalizedClass};
pub use bundle::{BundleCoverage, CoverageSummary, PackageCoverage};
pub use driver::{CoverageVisitor, ExecutionDataSource, SanitizeStats, SanitizingDriver};
pub use filters::{DropReason, DroppedMethod, FilterConfig, FilterKind, MethodCoverageFilter, Partition};
pub use listener::{CollectingListener, ReportWarning, SanitizeListener, TracingListener};
pub use options::{ReportMode, SanitizeOptions, DEFAULT_SOURCE_EXTENSION};
pub use types::{ClassCoverage, ClassDescriptor, ClassId, Counter, MethodCoverage, UNKNOWN_LINE};
