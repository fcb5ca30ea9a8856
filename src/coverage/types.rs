//! Core data types for method and class coverage.
//!
//! Everything here is pure data. Records arrive from the bytecode analyzer with
//! their counters already computed; the rest of the [`coverage`](super) module
//! only decides which of them survive.
//!
//! # Types
//!
//! - [`Counter`] - Missed/covered pair for one metric
//! - [`MethodCoverage`] - One method's identity and measured coverage
//! - [`ClassId`] - Content-derived class identifier
//! - [`ClassDescriptor`] - Identity of a class being visited
//! - [`ClassCoverage`] - Sanitized, immutable coverage of one class

use serde::{Deserialize, Serialize};
use std::fmt;

/// Line number used when a record carries no line information.
pub const UNKNOWN_LINE: i32 = -1;

/// Name the JVM reserves for instance initializers.
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// Missed/covered pair for a single coverage metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    #[serde(default)]
    pub missed: u32,
    #[serde(default)]
    pub covered: u32,
}

impl Counter {
    pub const EMPTY: Counter = Counter {
        missed: 0,
        covered: 0,
    };

    pub fn new(missed: u32, covered: u32) -> Self {
        Self { missed, covered }
    }

    /// Saturates at `u32::MAX` instead of overflowing.
    pub fn total(&self) -> u32 {
        self.missed.saturating_add(self.covered)
    }

    /// Same total, nothing covered.
    pub fn uncovered(&self) -> Self {
        Self::new(self.total(), 0)
    }

    pub fn add(&self, other: &Counter) -> Self {
        Self::new(
            self.missed.saturating_add(other.missed),
            self.covered.saturating_add(other.covered),
        )
    }

    /// Ratio of covered items, `None` when the counter is empty.
    pub fn covered_ratio(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(f64::from(self.covered) / f64::from(total)),
        }
    }
}

/// Coverage measured for one method.
///
/// Line numbers use [`UNKNOWN_LINE`] when the class was compiled without debug
/// information. Both lines are either known or unknown together, and
/// `first_line <= last_line` when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MethodRecord")]
pub struct MethodCoverage {
    pub name: String,
    pub desc: String,
    /// Generic signature, present only for generic methods
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    pub instructions: Counter,
    pub branches: Counter,
    pub lines: Counter,
    pub first_line: i32,
    pub last_line: i32,
}

/// Serialized form of a method record. A missing line counter is derived
/// from the line range.
#[derive(Deserialize)]
struct MethodRecord {
    name: String,
    #[serde(alias = "descriptor")]
    desc: String,
    #[serde(default)]
    signature: Option<String>,
    #[serde(default)]
    instructions: Counter,
    #[serde(default)]
    branches: Counter,
    #[serde(default)]
    lines: Option<Counter>,
    #[serde(default = "unknown_line")]
    first_line: i32,
    #[serde(default = "unknown_line")]
    last_line: i32,
}

fn unknown_line() -> i32 {
    UNKNOWN_LINE
}

impl From<MethodRecord> for MethodCoverage {
    fn from(record: MethodRecord) -> Self {
        let method = MethodCoverage {
            signature: record.signature,
            instructions: record.instructions,
            branches: record.branches,
            ..MethodCoverage::new(record.name, record.desc)
        }
        .with_lines(record.first_line, record.last_line);
        match record.lines {
            Some(lines) => method.with_line_counter(lines.missed, lines.covered),
            None => method,
        }
    }
}

impl MethodCoverage {
    /// Create a record with empty counters and no line information.
    pub fn new(name: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            desc: desc.into(),
            signature: None,
            instructions: Counter::EMPTY,
            branches: Counter::EMPTY,
            lines: Counter::EMPTY,
            first_line: UNKNOWN_LINE,
            last_line: UNKNOWN_LINE,
        }
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    /// Set the instruction counter. A line counter derived from a line range
    /// is re-derived, so builder order does not matter.
    pub fn with_instructions(mut self, missed: u32, covered: u32) -> Self {
        self.instructions = Counter::new(missed, covered);
        self.lines = self.derived_line_counter();
        self
    }

    pub fn with_branches(mut self, missed: u32, covered: u32) -> Self {
        self.branches = Counter::new(missed, covered);
        self
    }

    /// Set the line range and derive a line counter of the same span.
    ///
    /// Lines count as covered when any instruction is covered, which is the
    /// coarsest reading the analyzer can give us without per-line data.
    pub fn with_lines(mut self, first_line: i32, last_line: i32) -> Self {
        self.first_line = first_line;
        self.last_line = last_line;
        self.lines = self.derived_line_counter();
        self
    }

    fn derived_line_counter(&self) -> Counter {
        let span = if self.first_line > 0 && self.last_line >= self.first_line {
            (self.last_line - self.first_line + 1) as u32
        } else {
            0
        };
        if self.instructions.covered > 0 {
            Counter::new(0, span)
        } else {
            Counter::new(span, 0)
        }
    }

    /// Explicit line counter; apply after the other builders.
    pub fn with_line_counter(mut self, missed: u32, covered: u32) -> Self {
        self.lines = Counter::new(missed, covered);
        self
    }

    /// `name + desc`, the text the case-helper patterns are matched against.
    pub fn signature_text(&self) -> String {
        format!("{}{}", self.name, self.desc)
    }

    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }

    pub fn has_line_info(&self) -> bool {
        self.first_line > 0
    }

    /// Method counter: a method counts as covered once any instruction ran.
    pub fn method_counter(&self) -> Counter {
        if self.instructions.covered > 0 {
            Counter::new(0, 1)
        } else {
            Counter::new(1, 0)
        }
    }

    /// Same record as if its class never executed.
    pub fn without_execution(&self) -> Self {
        Self {
            instructions: self.instructions.uncovered(),
            branches: self.branches.uncovered(),
            lines: self.lines.uncovered(),
            ..self.clone()
        }
    }
}

/// Content-derived class identifier (a checksum of the class bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(pub u64);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Identity of a class as reported by the bytecode analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    /// VM name, e.g. `com/example/Shape`
    pub name: String,
    pub id: ClassId,
    /// Source file name without directories, e.g. `Shape.scala`
    #[serde(default)]
    pub source_file: Option<String>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>, id: u64, source_file: Option<&str>) -> Self {
        Self {
            name: name.into(),
            id: ClassId(id),
            source_file: source_file.map(str::to_string),
        }
    }

    /// Package part of the VM name, empty for the default package.
    pub fn package_name(&self) -> &str {
        self.name
            .rsplit_once('/')
            .map(|(package, _)| package)
            .unwrap_or("")
    }

    /// Simple class name without the package.
    pub fn simple_name(&self) -> &str {
        self.name
            .rsplit_once('/')
            .map(|(_, simple)| simple)
            .unwrap_or(&self.name)
    }

    pub fn source_file_has_extension(&self, extension: &str) -> bool {
        self.source_file
            .as_deref()
            .is_some_and(|file| file.ends_with(extension))
    }
}

/// Sanitized coverage of one class.
///
/// Produced only by [`ClassCoverageAccumulator::finalize`](super::ClassCoverageAccumulator::finalize)
/// and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassCoverage {
    #[serde(flatten)]
    descriptor: ClassDescriptor,
    /// Execution data exists for this class name but for a different class id
    no_match: bool,
    /// No probes matched this class at all
    no_execution_data: bool,
    methods: Vec<MethodCoverage>,
}

impl ClassCoverage {
    pub(crate) fn new(
        descriptor: ClassDescriptor,
        no_match: bool,
        no_execution_data: bool,
        methods: Vec<MethodCoverage>,
    ) -> Self {
        Self {
            descriptor,
            no_match,
            no_execution_data,
            methods,
        }
    }

    pub fn descriptor(&self) -> &ClassDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn id(&self) -> ClassId {
        self.descriptor.id
    }

    pub fn source_file(&self) -> Option<&str> {
        self.descriptor.source_file.as_deref()
    }

    pub fn is_no_match(&self) -> bool {
        self.no_match
    }

    pub fn has_execution_data(&self) -> bool {
        !self.no_execution_data
    }

    pub fn methods(&self) -> &[MethodCoverage] {
        &self.methods
    }

    pub fn method_names(&self) -> Vec<&str> {
        self.methods.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn instruction_counter(&self) -> Counter {
        self.sum(|m| m.instructions)
    }

    pub fn branch_counter(&self) -> Counter {
        self.sum(|m| m.branches)
    }

    pub fn line_counter(&self) -> Counter {
        self.sum(|m| m.lines)
    }

    pub fn method_counter(&self) -> Counter {
        self.sum(|m| m.method_counter())
    }

    /// A class counts as covered once any of its methods is covered.
    pub fn class_counter(&self) -> Counter {
        if self.method_counter().covered > 0 {
            Counter::new(0, 1)
        } else {
            Counter::new(1, 0)
        }
    }

    /// Lowest known first line among the kept methods.
    pub fn first_line(&self) -> i32 {
        self.methods
            .iter()
            .filter(|m| m.has_line_info())
            .map(|m| m.first_line)
            .min()
            .unwrap_or(UNKNOWN_LINE)
    }

    /// Highest known last line among the kept methods.
    pub fn last_line(&self) -> i32 {
        self.methods
            .iter()
            .filter(|m| m.has_line_info())
            .map(|m| m.last_line)
            .max()
            .unwrap_or(UNKNOWN_LINE)
    }

    /// Executable code present but no line table: compiled without debug info.
    pub fn lacks_debug_information(&self) -> bool {
        self.instruction_counter().total() > 0 && self.line_counter().total() == 0
    }

    fn sum(&self, counter: impl Fn(&MethodCoverage) -> Counter) -> Counter {
        self.methods
            .iter()
            .fold(Counter::EMPTY, |acc, m| acc.add(&counter(m)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_total_and_ratio() {
        let counter = Counter::new(3, 1);
        assert_eq!(counter.total(), 4);
        assert_eq!(counter.covered_ratio(), Some(0.25));
        assert_eq!(Counter::EMPTY.covered_ratio(), None);
    }

    #[test]
    fn test_counter_uncovered_keeps_total() {
        let counter = Counter::new(2, 5).uncovered();
        assert_eq!(counter, Counter::new(7, 0));
    }

    #[test]
    fn test_with_lines_derives_line_counter() {
        let covered = MethodCoverage::new("run", "()V")
            .with_instructions(0, 4)
            .with_lines(10, 12);
        assert_eq!(covered.lines, Counter::new(0, 3));

        let missed = MethodCoverage::new("run", "()V")
            .with_instructions(4, 0)
            .with_lines(10, 12);
        assert_eq!(missed.lines, Counter::new(3, 0));
    }

    #[test]
    fn test_line_counter_independent_of_builder_order() {
        let lines_first = MethodCoverage::new("run", "()V")
            .with_lines(3, 4)
            .with_instructions(0, 5);
        let instructions_first = MethodCoverage::new("run", "()V")
            .with_instructions(0, 5)
            .with_lines(3, 4);
        assert_eq!(lines_first.lines, Counter::new(0, 2));
        assert_eq!(lines_first, instructions_first);
    }

    #[test]
    fn test_explicit_line_counter_survives_when_applied_last() {
        let method = MethodCoverage::new("run", "()V")
            .with_lines(3, 4)
            .with_instructions(0, 5)
            .with_line_counter(1, 1);
        assert_eq!(method.lines, Counter::new(1, 1));
    }

    #[test]
    fn test_counter_saturates_on_large_counts() {
        let huge = Counter::new(u32::MAX, 1);
        assert_eq!(huge.total(), u32::MAX);
        assert_eq!(huge.uncovered(), Counter::new(u32::MAX, 0));
        assert_eq!(huge.add(&Counter::new(7, u32::MAX)), Counter::new(u32::MAX, u32::MAX));
    }

    #[test]
    fn test_with_lines_unknown_has_empty_line_counter() {
        let method = MethodCoverage::new("run", "()V")
            .with_instructions(0, 4)
            .with_lines(UNKNOWN_LINE, UNKNOWN_LINE);
        assert_eq!(method.lines.total(), 0);
        assert!(!method.has_line_info());
    }

    #[test]
    fn test_without_execution_zeroes_covered() {
        let method = MethodCoverage::new("run", "()V")
            .with_instructions(1, 4)
            .with_branches(0, 2)
            .with_lines(3, 4);
        let reset = method.without_execution();
        assert_eq!(reset.instructions, Counter::new(5, 0));
        assert_eq!(reset.branches, Counter::new(2, 0));
        assert_eq!(reset.lines, Counter::new(2, 0));
        assert_eq!(reset.first_line, 3);
        assert_eq!(reset.method_counter(), Counter::new(1, 0));
    }

    #[test]
    fn test_descriptor_package_and_simple_name() {
        let nested = ClassDescriptor::new("com/example/Shape", 1, Some("Shape.scala"));
        assert_eq!(nested.package_name(), "com/example");
        assert_eq!(nested.simple_name(), "Shape");

        let top = ClassDescriptor::new("Main", 2, None);
        assert_eq!(top.package_name(), "");
        assert_eq!(top.simple_name(), "Main");
        assert!(!top.source_file_has_extension(".scala"));
    }

    #[test]
    fn test_class_id_display_is_fixed_width_hex() {
        assert_eq!(ClassId(0xab).to_string(), "00000000000000ab");
    }

    #[test]
    fn test_class_coverage_counters() {
        let class = ClassCoverage::new(
            ClassDescriptor::new("a/B", 7, Some("B.scala")),
            false,
            false,
            vec![
                MethodCoverage::new("<init>", "()V")
                    .with_instructions(0, 3)
                    .with_lines(4, 4),
                MethodCoverage::new("run", "()V")
                    .with_instructions(5, 0)
                    .with_lines(8, 9),
            ],
        );
        assert_eq!(class.instruction_counter(), Counter::new(5, 3));
        assert_eq!(class.method_counter(), Counter::new(1, 1));
        assert_eq!(class.class_counter(), Counter::new(0, 1));
        assert_eq!(class.first_line(), 4);
        assert_eq!(class.last_line(), 9);
        assert!(!class.lacks_debug_information());
    }

    #[test]
    fn test_method_deserializes_with_defaults() {
        let method: MethodCoverage =
            serde_json::from_str(r#"{"name":"run","descriptor":"()V"}"#).unwrap();
        assert_eq!(method.desc, "()V");
        assert_eq!(method.first_line, UNKNOWN_LINE);
        assert_eq!(method.instructions, Counter::EMPTY);
        assert_eq!(method.lines, Counter::EMPTY);
    }

    #[test]
    fn test_method_line_counter_derived_when_absent() {
        let method: MethodCoverage = serde_json::from_str(
            r#"{"name":"run","desc":"()V","instructions":{"covered":2},"first_line":4,"last_line":6}"#,
        )
        .unwrap();
        assert_eq!(method.lines, Counter::new(0, 3));

        let explicit: MethodCoverage = serde_json::from_str(
            r#"{"name":"run","desc":"()V","lines":{"missed":1,"covered":1},"first_line":4,"last_line":6}"#,
        )
        .unwrap();
        assert_eq!(explicit.lines, Counter::new(1, 1));
    }
}
