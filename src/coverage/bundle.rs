//! Report-wide aggregation of sanitized classes.

use super::driver::CoverageVisitor;
use super::types::{ClassCoverage, Counter};
use serde::Serialize;
use std::collections::BTreeMap;

/// Totals over any group of classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CoverageSummary {
    pub instructions: Counter,
    pub branches: Counter,
    pub lines: Counter,
    pub methods: Counter,
    pub classes: Counter,
}

impl CoverageSummary {
    pub fn of<'a>(classes: impl IntoIterator<Item = &'a ClassCoverage>) -> Self {
        classes
            .into_iter()
            .fold(CoverageSummary::default(), |acc, class| CoverageSummary {
                instructions: acc.instructions.add(&class.instruction_counter()),
                branches: acc.branches.add(&class.branch_counter()),
                lines: acc.lines.add(&class.line_counter()),
                methods: acc.methods.add(&class.method_counter()),
                classes: acc.classes.add(&class.class_counter()),
            })
    }
}

/// Classes of one package, in emission order.
#[derive(Debug, Clone, Serialize)]
pub struct PackageCoverage<'a> {
    pub name: &'a str,
    pub summary: CoverageSummary,
    pub classes: Vec<&'a ClassCoverage>,
}

/// All classes of one report run. Collects whatever the driver emits.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BundleCoverage {
    name: String,
    classes: Vec<ClassCoverage>,
}

impl BundleCoverage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            classes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn classes(&self) -> &[ClassCoverage] {
        &self.classes
    }

    pub fn summary(&self) -> CoverageSummary {
        CoverageSummary::of(&self.classes)
    }

    /// Classes grouped by package, packages sorted by name.
    pub fn packages(&self) -> Vec<PackageCoverage<'_>> {
        let mut grouped: BTreeMap<&str, Vec<&ClassCoverage>> = BTreeMap::new();
        for class in &self.classes {
            grouped
                .entry(class.descriptor().package_name())
                .or_default()
                .push(class);
        }
        grouped
            .into_iter()
            .map(|(name, classes)| PackageCoverage {
                name,
                summary: CoverageSummary::of(classes.iter().copied()),
                classes,
            })
            .collect()
    }

    /// Bundle-level form of the debug information check.
    pub fn lacks_debug_information(&self) -> bool {
        let summary = self.summary();
        summary.classes.total() > 0 && summary.lines.total() == 0
    }
}

impl CoverageVisitor for BundleCoverage {
    fn visit_class(&mut self, class: ClassCoverage) {
        self.classes.push(class);
    }
}
