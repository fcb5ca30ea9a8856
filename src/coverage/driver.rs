//! The sanitizing driver: per-class lifecycle between analyzer and renderer.
//!
//! The bytecode analyzer calls [`SanitizingDriver::begin_class`], then
//! [`SanitizingDriver::method`] once per method, then
//! [`SanitizingDriver::end_class`]. Each class moves through
//!
//! ```text
//! OPEN (accumulator buffers records)
//!   -> FINALIZING (finalize consumes the accumulator)
//!   -> EMITTED (ClassCoverage moved into the visitor, never touched again)
//! ```
//!
//! Classes are processed one at a time. A class without execution data is
//! still emitted, with zero coverage, so it shows up as untested instead of
//! disappearing from the report.

use super::accumulator::{ClassCoverageAccumulator, FinalizedClass};
use super::listener::{ReportWarning, SanitizeListener};
use super::options::SanitizeOptions;
use super::types::{ClassCoverage, ClassDescriptor, ClassId, MethodCoverage};
use crate::errors::{Result, SanitizeError};

/// Source of per-class execution probes.
pub trait ExecutionDataSource {
    /// Probes recorded for the class with this content id, if any.
    fn probes_for(&self, id: ClassId) -> Option<&[bool]>;

    /// Whether probes exist for a class of this name under any id.
    fn contains_name(&self, name: &str) -> bool;
}

/// Downstream consumer of sanitized classes (the report tree).
pub trait CoverageVisitor {
    fn visit_class(&mut self, class: ClassCoverage);
}

impl CoverageVisitor for Vec<ClassCoverage> {
    fn visit_class(&mut self, class: ClassCoverage) {
        self.push(class);
    }
}

impl<V: CoverageVisitor + ?Sized> CoverageVisitor for &mut V {
    fn visit_class(&mut self, class: ClassCoverage) {
        (**self).visit_class(class)
    }
}

/// Counts for one run, mostly for the closing log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeStats {
    pub classes: usize,
    pub classes_without_data: usize,
    pub methods_seen: usize,
    pub methods_kept: usize,
    pub methods_dropped: usize,
}

pub struct SanitizingDriver<'a, D: ?Sized, V, L> {
    execution_data: &'a D,
    options: SanitizeOptions,
    visitor: V,
    listener: L,
    current: Option<ClassCoverageAccumulator>,
    debug_warning_raised: bool,
    stats: SanitizeStats,
}

impl<'a, D, V, L> SanitizingDriver<'a, D, V, L>
where
    D: ExecutionDataSource + ?Sized,
    V: CoverageVisitor,
    L: SanitizeListener,
{
    pub fn new(execution_data: &'a D, options: SanitizeOptions, visitor: V, listener: L) -> Self {
        Self {
            execution_data,
            options,
            visitor,
            listener,
            current: None,
            debug_warning_raised: false,
            stats: SanitizeStats::default(),
        }
    }

    pub fn options(&self) -> &SanitizeOptions {
        &self.options
    }

    pub fn stats(&self) -> SanitizeStats {
        self.stats
    }

    /// The class currently accepting records, if one is open.
    pub fn open_class(&self) -> Option<&ClassDescriptor> {
        self.current.as_ref().map(|acc| acc.descriptor())
    }

    pub fn begin_class(&mut self, descriptor: ClassDescriptor) -> Result<()> {
        if let Some(open) = self.open_class() {
            return Err(SanitizeError::lifecycle(format!(
                "begin_class({}) while {} is still open",
                descriptor.name, open.name
            )));
        }

        let has_execution_data = self.execution_data.probes_for(descriptor.id).is_some();
        // Data recorded for this name under another id: the class was rebuilt
        let no_match = !has_execution_data && self.execution_data.contains_name(&descriptor.name);
        if !has_execution_data {
            tracing::debug!(
                "No execution data for {} ({}){}",
                descriptor.name,
                descriptor.id,
                if no_match { ", class id does not match" } else { "" }
            );
        }

        self.current = Some(ClassCoverageAccumulator::new(
            descriptor,
            no_match,
            has_execution_data,
        ));
        Ok(())
    }

    pub fn method(&mut self, method: MethodCoverage) -> Result<()> {
        let acc = self.current.as_mut().ok_or_else(|| {
            SanitizeError::lifecycle(format!(
                "method({}{}) with no open class",
                method.name, method.desc
            ))
        })?;
        acc.add_method(method);
        self.stats.methods_seen += 1;
        Ok(())
    }

    pub fn end_class(&mut self) -> Result<()> {
        let acc = self
            .current
            .take()
            .ok_or_else(|| SanitizeError::lifecycle("end_class with no open class"))?;

        let _span = tracing::debug_span!("class", name = %acc.descriptor().name).entered();
        let FinalizedClass { coverage, dropped } = acc.finalize(&self.options);

        for method in &dropped {
            self.listener.method_dropped(coverage.descriptor(), method);
        }
        self.stats.classes += 1;
        self.stats.methods_kept += coverage.methods().len();
        self.stats.methods_dropped += dropped.len();
        if !coverage.has_execution_data() {
            self.stats.classes_without_data += 1;
        }

        if coverage.lacks_debug_information() && !self.debug_warning_raised {
            self.debug_warning_raised = true;
            self.listener.warning(ReportWarning::MissingDebugInformation);
        }

        self.listener.class_emitted(&coverage);
        self.visitor.visit_class(coverage);
        Ok(())
    }

    /// Run a whole class through the lifecycle at once.
    pub fn analyze_class<I>(&mut self, descriptor: ClassDescriptor, methods: I) -> Result<()>
    where
        I: IntoIterator<Item = MethodCoverage>,
    {
        self.begin_class(descriptor)?;
        for method in methods {
            self.method(method)?;
        }
        self.end_class()
    }

    /// Close the run and hand back the visitor and listener.
    pub fn finish(self) -> Result<(V, L)> {
        if let Some(open) = self.current {
            return Err(SanitizeError::lifecycle(format!(
                "finish with {} still open",
                open.descriptor().name
            )));
        }
        tracing::info!(
            "Sanitized {} class(es): kept {} of {} method(s)",
            self.stats.classes,
            self.stats.methods_kept,
            self.stats.methods_seen
        );
        Ok((self.visitor, self.listener))
    }
}
