//! One row per class, in the column layout coverage tools commonly emit.

use crate::coverage::{BundleCoverage, ClassCoverage};
use crate::io::output::{CoverageReport, ReportWriter};
use std::io::Write;

pub const HEADER: &str = "GROUP,PACKAGE,CLASS,INSTRUCTION_MISSED,INSTRUCTION_COVERED,\
BRANCH_MISSED,BRANCH_COVERED,LINE_MISSED,LINE_COVERED,METHOD_MISSED,METHOD_COVERED";

pub struct CsvWriter<W: Write> {
    writer: W,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_row(&mut self, group: &str, package: &str, class: &ClassCoverage) -> anyhow::Result<()> {
        let instructions = class.instruction_counter();
        let branches = class.branch_counter();
        let lines = class.line_counter();
        let methods = class.method_counter();
        writeln!(
            self.writer,
            "{},{},{},{},{},{},{},{},{},{},{}",
            escape(group),
            escape(&package.replace('/', ".")),
            escape(class.descriptor().simple_name()),
            instructions.missed,
            instructions.covered,
            branches.missed,
            branches.covered,
            lines.missed,
            lines.covered,
            methods.missed,
            methods.covered,
        )?;
        Ok(())
    }
}

impl<W: Write> ReportWriter for CsvWriter<W> {
    fn write_report(&mut self, bundle: &BundleCoverage, _report: &CoverageReport<'_>) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", HEADER)?;
        for package in bundle.packages() {
            for class in &package.classes {
                self.write_row(bundle.name(), package.name, class)?;
            }
        }
        Ok(())
    }
}

/// Quote a field when it holds a separator, quote or line break.
fn escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
