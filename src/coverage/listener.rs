//! Observation hooks for one sanitizing run.
//!
//! The driver never logs through a global; it is handed a listener value whose
//! lifetime is the report build. [`TracingListener`] forwards to `tracing`,
//! [`CollectingListener`] keeps everything for later inspection.

use super::filters::DroppedMethod;
use super::types::{ClassCoverage, ClassDescriptor};
use serde::Serialize;
use std::fmt;

/// Advisory conditions surfaced once per run. Never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportWarning {
    /// Classes carry code but no line tables
    MissingDebugInformation,
}

impl fmt::Display for ReportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportWarning::MissingDebugInformation => f.write_str(
                "To enable source code annotation class files have to be compiled with debug information.",
            ),
        }
    }
}

pub trait SanitizeListener {
    fn method_dropped(&mut self, _class: &ClassDescriptor, _dropped: &DroppedMethod) {}

    fn class_emitted(&mut self, _class: &ClassCoverage) {}

    fn warning(&mut self, warning: ReportWarning);
}

impl<L: SanitizeListener + ?Sized> SanitizeListener for &mut L {
    fn method_dropped(&mut self, class: &ClassDescriptor, dropped: &DroppedMethod) {
        (**self).method_dropped(class, dropped)
    }

    fn class_emitted(&mut self, class: &ClassCoverage) {
        (**self).class_emitted(class)
    }

    fn warning(&mut self, warning: ReportWarning) {
        (**self).warning(warning)
    }
}

/// Fan-out to two listeners.
impl<A: SanitizeListener, B: SanitizeListener> SanitizeListener for (A, B) {
    fn method_dropped(&mut self, class: &ClassDescriptor, dropped: &DroppedMethod) {
        self.0.method_dropped(class, dropped);
        self.1.method_dropped(class, dropped);
    }

    fn class_emitted(&mut self, class: &ClassCoverage) {
        self.0.class_emitted(class);
        self.1.class_emitted(class);
    }

    fn warning(&mut self, warning: ReportWarning) {
        self.0.warning(warning);
        self.1.warning(warning);
    }
}

/// Forwards decisions at debug level and warnings at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingListener;

impl SanitizeListener for TracingListener {
    fn method_dropped(&mut self, class: &ClassDescriptor, dropped: &DroppedMethod) {
        tracing::debug!(
            "{}: dropping {}:{}-{} ({})",
            class.name,
            dropped.method.name,
            dropped.method.first_line,
            dropped.method.last_line,
            dropped.reason
        );
    }

    fn class_emitted(&mut self, class: &ClassCoverage) {
        tracing::debug!(
            "{}:{}:{}-{} emitted with {} method(s)",
            class.source_file().unwrap_or("?"),
            class.name(),
            class.first_line(),
            class.last_line(),
            class.methods().len()
        );
    }

    fn warning(&mut self, warning: ReportWarning) {
        tracing::warn!("{}", warning);
    }
}

/// Records everything it hears.
#[derive(Debug, Clone, Default)]
pub struct CollectingListener {
    pub dropped: Vec<(String, DroppedMethod)>,
    pub emitted: Vec<String>,
    pub warnings: Vec<ReportWarning>,
}

impl SanitizeListener for CollectingListener {
    fn method_dropped(&mut self, class: &ClassDescriptor, dropped: &DroppedMethod) {
        self.dropped.push((class.name.clone(), dropped.clone()));
    }

    fn class_emitted(&mut self, class: &ClassCoverage) {
        self.emitted.push(class.name().to_string());
    }

    fn warning(&mut self, warning: ReportWarning) {
        self.warnings.push(warning);
    }
}
