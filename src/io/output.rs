use crate::coverage::{BundleCoverage, ClassCoverage, CoverageSummary, FilterConfig, ReportWarning};
use crate::io::writers::{CsvWriter, JsonWriter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Json => f.write_str("json"),
            ReportFormat::Csv => f.write_str("csv"),
        }
    }
}

/// Everything a writer renders for one run.
#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport<'a> {
    pub bundle: &'a str,
    pub filters: Vec<&'static str>,
    pub summary: CoverageSummary,
    pub warnings: Vec<String>,
    pub classes: &'a [ClassCoverage],
}

impl<'a> CoverageReport<'a> {
    pub fn new(bundle: &'a BundleCoverage, filters: &FilterConfig, warnings: &[ReportWarning]) -> Self {
        Self {
            bundle: bundle.name(),
            filters: filters.kinds().map(|k| k.identifier()).collect(),
            summary: bundle.summary(),
            warnings: warnings.iter().map(ToString::to_string).collect(),
            classes: bundle.classes(),
        }
    }
}

pub trait ReportWriter {
    fn write_report(&mut self, bundle: &BundleCoverage, report: &CoverageReport<'_>) -> anyhow::Result<()>;
}

pub fn create_writer<'w, W: Write + 'w>(format: ReportFormat, writer: W) -> Box<dyn ReportWriter + 'w> {
    match format {
        ReportFormat::Json => Box::new(JsonWriter::new(writer)),
        ReportFormat::Csv => Box::new(CsvWriter::new(writer)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::{
        ClassCoverageAccumulator, ClassDescriptor, CoverageVisitor, MethodCoverage, SanitizeOptions,
    };

    fn bundle() -> BundleCoverage {
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
        bundle.visit_class(acc.finalize(&SanitizeOptions::default()).coverage);
        bundle
    }

    #[test]
    fn test_report_collects_bundle_data() {
        let bundle = bundle();
        let report = CoverageReport::new(
            &bundle,
            &FilterConfig::all(),
            &[ReportWarning::MissingDebugInformation],
        );
        assert_eq!(report.bundle, "shapes");
        assert_eq!(report.filters, vec!["MIXIN", "CASE"]);
        assert_eq!(report.classes.len(), 1);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_create_writer_dispatches_on_format() {
        let bundle = bundle();
        let report = CoverageReport::new(&bundle, &FilterConfig::none(), &[]);

        let mut csv = Vec::new();
        create_writer(ReportFormat::Csv, &mut csv)
            .write_report(&bundle, &report)
            .unwrap();
        assert!(String::from_utf8(csv).unwrap().starts_with("GROUP,PACKAGE,CLASS"));

        let mut json = Vec::new();
        create_writer(ReportFormat::Json, &mut json)
            .write_report(&bundle, &report)
            .unwrap();
        assert!(String::from_utf8(json).unwrap().contains("\"bundle\": \"shapes\""));
    }

    #[test]
    fn test_report_format_display() {
        assert_eq!(ReportFormat::Csv.to_string(), "csv");
        assert_eq!(ReportFormat::default(), ReportFormat::Json);
    }
}
