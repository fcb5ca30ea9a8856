use crate::coverage::BundleCoverage;
use crate::io::output::{CoverageReport, ReportWriter};
use std::io::Write;

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for JsonWriter<W> {
    fn write_report(&mut self, _bundle: &BundleCoverage, report: &CoverageReport<'_>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::{
        ClassCoverageAccumulator, ClassDescriptor, CoverageVisitor, FilterConfig, MethodCoverage,
        SanitizeOptions,
    };

    #[test]
    fn test_json_lists_kept_methods_and_totals() {
        let mut bundle = BundleCoverage::new("shapes");
        let mut acc = ClassCoverageAccumulator::new(
            ClassDescriptor::new("com/example/Point", 81, Some("Point.scala")),
            false,
            true,
        );
        acc.add_method(
            MethodCoverage::new("<init>", "(II)V")
                .with_instructions(0, 9)
                .with_lines(3, 3),
        );
        acc.add_method(
            MethodCoverage::new("copy$default$1", "()I")
                .with_instructions(3, 0)
                .with_lines(3, 3),
        );
        let filters = FilterConfig::all();
        bundle.visit_class(acc.finalize(&SanitizeOptions::with_filters(filters.clone())).coverage);

        let report = CoverageReport::new(&bundle, &filters, &[]);
        let mut out = Vec::new();
        JsonWriter::new(&mut out).write_report(&bundle, &report).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["bundle"], "shapes");
        assert_eq!(value["filters"], serde_json::json!(["MIXIN", "CASE"]));
        assert_eq!(value["summary"]["instructions"]["covered"], 9);
        let methods = value["classes"][0]["methods"].as_array().unwrap();
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0]["name"], "<init>");
        assert_eq!(value["classes"][0]["name"], "com/example/Point");
    }
}
