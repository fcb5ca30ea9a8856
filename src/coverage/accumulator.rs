//! Per-class buffering and the finalize step.
//!
//! A [`ClassCoverageAccumulator`] is the OPEN state of a class: it accepts
//! method records in discovery order. [`ClassCoverageAccumulator::finalize`]
//! consumes it, runs the filters once over the complete buffer, and yields the
//! immutable [`ClassCoverage`] that is handed downstream.
//!
//! The filters only rely on set membership (constructor lines, the minimum
//! first line), so buffering order does not change the kept set. Completeness
//! does, which is why nothing is decided before `finalize`.

use super::filters::{BaselineFilter, DroppedMethod, MethodCoverageFilter, Partition};
use super::options::SanitizeOptions;
use super::types::{ClassCoverage, ClassDescriptor, MethodCoverage, UNKNOWN_LINE};

#[derive(Debug, Clone)]
pub struct ClassCoverageAccumulator {
    descriptor: ClassDescriptor,
    no_match: bool,
    has_execution_data: bool,
    methods: Vec<MethodCoverage>,
}

/// A finalized class together with what was filtered out of it.
#[derive(Debug, Clone)]
pub struct FinalizedClass {
    pub coverage: ClassCoverage,
    pub dropped: Vec<DroppedMethod>,
}

impl ClassCoverageAccumulator {
    pub fn new(descriptor: ClassDescriptor, no_match: bool, has_execution_data: bool) -> Self {
        Self {
            descriptor,
            no_match,
            has_execution_data,
            methods: Vec::new(),
        }
    }

    pub fn descriptor(&self) -> &ClassDescriptor {
        &self.descriptor
    }

    pub fn methods(&self) -> &[MethodCoverage] {
        &self.methods
    }

    /// Buffer a record. Without execution data its covered counts are zeroed.
    pub fn add_method(&mut self, method: MethodCoverage) {
        let method = if self.has_execution_data {
            method
        } else {
            method.without_execution()
        };
        self.methods.push(method);
    }

    /// Smallest first line among records with both line info and instructions.
    pub fn real_first_line(&self) -> i32 {
        real_first_line(&self.methods)
    }

    /// Pure filtering of the current buffer; does not change the accumulator.
    pub fn sanitize(&self, options: &SanitizeOptions) -> Partition {
        let applies_name_rule = self
            .descriptor
            .source_file_has_extension(&options.source_extension);
        let baseline = BaselineFilter::new(self.real_first_line(), applies_name_rule);
        options.filters.apply(baseline.apply(self.methods.clone()))
    }

    pub fn finalize(self, options: &SanitizeOptions) -> FinalizedClass {
        let Partition { kept, dropped } = self.sanitize(options);
        FinalizedClass {
            coverage: ClassCoverage::new(
                self.descriptor,
                self.no_match,
                !self.has_execution_data,
                kept,
            ),
            dropped,
        }
    }
}

pub fn real_first_line(methods: &[MethodCoverage]) -> i32 {
    methods
        .iter()
        .filter(|m| m.first_line > 0 && m.instructions.total() > 0)
        .map(|m| m.first_line)
        .min()
        .unwrap_or(UNKNOWN_LINE)
}
