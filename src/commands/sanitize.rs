//! The `sanitize` command: dumps in, sanitized report out.

use crate::config::{self, CovsanConfig};
use crate::coverage::{
    BundleCoverage, CollectingListener, FilterConfig, ReportMode, ReportWarning, SanitizeStats,
    SanitizingDriver, TracingListener,
};
use crate::io::{create_writer, AnalysisDump, CoverageReport, ExecutionDataStore, FileFilter, ReportFormat};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Bundle name used when neither the command line nor the dump names one.
pub const DEFAULT_BUNDLE_NAME: &str = "coverage";

pub struct SanitizeConfig {
    pub classes: PathBuf,
    pub exec: PathBuf,
    pub filters: Option<Vec<String>>,
    pub includes: Option<Vec<String>>,
    pub excludes: Option<Vec<String>>,
    pub source_extension: Option<String>,
    pub format: Option<ReportFormat>,
    pub output: Option<PathBuf>,
    pub bundle: Option<String>,
    pub config: Option<PathBuf>,
    pub skip: bool,
}

/// Command line values merged over `.covsan.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizeSettings {
    pub filters: FilterConfig,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub source_extension: String,
    pub format: ReportFormat,
    pub bundle: Option<String>,
    pub skip: bool,
}

impl SanitizeSettings {
    pub fn resolve(cli: &SanitizeConfig, file: &CovsanConfig) -> Self {
        let filters = match &cli.filters {
            Some(identifiers) => FilterConfig::from_identifiers(identifiers),
            None => file.filter_config(),
        };
        Self {
            filters,
            includes: cli.includes.clone().unwrap_or_else(|| file.includes.clone()),
            excludes: cli.excludes.clone().unwrap_or_else(|| file.excludes.clone()),
            source_extension: cli
                .source_extension
                .clone()
                .unwrap_or_else(|| file.source_extension().to_string()),
            format: cli.format.unwrap_or_else(|| file.output_format()),
            bundle: cli.bundle.clone(),
            skip: cli.skip || file.skip,
        }
    }
}

impl Default for SanitizeSettings {
    fn default() -> Self {
        Self::resolve(
            &SanitizeConfig {
                classes: PathBuf::new(),
                exec: PathBuf::new(),
                filters: None,
                includes: None,
                excludes: None,
                source_extension: None,
                format: None,
                output: None,
                bundle: None,
                config: None,
                skip: false,
            },
            &CovsanConfig::default(),
        )
    }
}

#[derive(Debug)]
pub struct SanitizeOutcome {
    pub bundle: BundleCoverage,
    pub warnings: Vec<ReportWarning>,
    pub stats: SanitizeStats,
    /// Classes left out by the include/exclude patterns
    pub excluded: usize,
}

/// Run every selected class of the dump through the driver.
pub fn sanitize_dump(
    dump: AnalysisDump,
    execution_data: &ExecutionDataStore,
    settings: &SanitizeSettings,
) -> Result<SanitizeOutcome> {
    let file_filter = FileFilter::new(&settings.includes, &settings.excludes)?;
    let mode = ReportMode::from_filters(settings.filters.clone());
    let name = settings
        .bundle
        .clone()
        .or(dump.bundle)
        .unwrap_or_else(|| DEFAULT_BUNDLE_NAME.to_string());

    let mut driver = SanitizingDriver::new(
        execution_data,
        mode.options(&settings.source_extension),
        BundleCoverage::new(name),
        (TracingListener, CollectingListener::default()),
    );

    let mut excluded = 0;
    for class in dump.classes {
        let location = class.location();
        if !file_filter.matches(&location) {
            tracing::debug!("Excluding {}", location);
            excluded += 1;
            continue;
        }
        driver.analyze_class(class.descriptor, class.methods)?;
    }

    let stats = driver.stats();
    let (bundle, (_, collected)) = driver.finish()?;
    Ok(SanitizeOutcome {
        bundle,
        warnings: collected.warnings,
        stats,
        excluded,
    })
}

pub fn write_report(
    outcome: &SanitizeOutcome,
    settings: &SanitizeSettings,
    writer: impl Write,
) -> Result<()> {
    let report = CoverageReport::new(&outcome.bundle, &settings.filters, &outcome.warnings);
    create_writer(settings.format, writer).write_report(&outcome.bundle, &report)
}

pub fn sanitize(config: SanitizeConfig) -> Result<()> {
    let file_config = match &config.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config(),
    };
    let settings = SanitizeSettings::resolve(&config, &file_config);

    if settings.skip {
        tracing::info!("Skipping covsan execution because property skip is set.");
        return Ok(());
    }
    if !config.exec.exists() {
        tracing::info!(
            "Skipping covsan execution due to missing execution data file: {}",
            config.exec.display()
        );
        return Ok(());
    }

    let dump = AnalysisDump::load(&config.classes)
        .with_context(|| format!("Failed to load class analysis from {}", config.classes.display()))?;
    let execution_data = ExecutionDataStore::load(&config.exec)
        .with_context(|| format!("Failed to load execution data from {}", config.exec.display()))?;

    tracing::info!(
        "Sanitizing {} class(es) with filters [{}]",
        dump.classes.len(),
        settings.filters
    );
    let outcome = sanitize_dump(dump, &execution_data, &settings)?;
    if outcome.excluded > 0 {
        tracing::info!("{} class(es) excluded by include/exclude patterns", outcome.excluded);
    }

    match &config.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_report(&outcome, &settings, &mut writer)?;
            writer
                .flush()
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            tracing::info!("Wrote {} report to {}", settings.format, path.display());
        }
        None => {
            let stdout = std::io::stdout();
            write_report(&outcome, &settings, stdout.lock())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::{ClassDescriptor, ClassId, FilterKind, MethodCoverage};
    use crate::io::{ClassDump, ExecutionData};

    fn cli_config() -> SanitizeConfig {
        SanitizeConfig {
            classes: PathBuf::from("classes.json"),
            exec: PathBuf::from("exec.json"),
            filters: None,
            includes: None,
            excludes: None,
            source_extension: None,
            format: None,
            output: None,
            bundle: None,
            config: None,
            skip: false,
        }
    }

    fn class_dump(name: &str, id: u64, methods: Vec<MethodCoverage>) -> ClassDump {
        ClassDump {
            descriptor: ClassDescriptor::new(name, id, Some("Shape.scala")),
            location: None,
            methods,
        }
    }

    fn store(ids: &[(u64, &str)]) -> ExecutionDataStore {
        let mut store = ExecutionDataStore::new();
        for (id, name) in ids {
            store
                .put(ExecutionData {
                    id: ClassId(*id),
                    name: name.to_string(),
                    probes: vec![true],
                })
                .unwrap();
        }
        store
    }

    #[test]
    fn test_cli_values_override_file_values() {
        let file = CovsanConfig {
            filters: vec!["MIXIN".into()],
            excludes: vec!["**/Gen*".into()],
            skip: false,
            ..CovsanConfig::default()
        };
        let cli = SanitizeConfig {
            filters: Some(vec!["CASE".into()]),
            format: Some(ReportFormat::Csv),
            ..cli_config()
        };

        let settings = SanitizeSettings::resolve(&cli, &file);
        assert_eq!(settings.filters, FilterConfig::from_kinds([FilterKind::Case]));
        assert_eq!(settings.excludes, vec!["**/Gen*".to_string()]);
        assert_eq!(settings.format, ReportFormat::Csv);
        assert_eq!(settings.source_extension, ".scala");
    }

    #[test]
    fn test_skip_from_either_source() {
        let file = CovsanConfig {
            skip: true,
            ..CovsanConfig::default()
        };
        assert!(SanitizeSettings::resolve(&cli_config(), &file).skip);
        let cli = SanitizeConfig {
            skip: true,
            ..cli_config()
        };
        assert!(SanitizeSettings::resolve(&cli, &CovsanConfig::default()).skip);
    }

    #[test]
    fn test_sanitize_dump_applies_file_filter() {
        let dump = AnalysisDump {
            bundle: Some("shapes".into()),
            classes: vec![
                class_dump(
                    "com/example/Circle",
                    1,
                    vec![MethodCoverage::new("area", "()D").with_instructions(0, 4).with_lines(5, 6)],
                ),
                class_dump(
                    "com/example/CircleTest",
                    2,
                    vec![MethodCoverage::new("run", "()V").with_instructions(0, 2).with_lines(3, 3)],
                ),
            ],
        };
        let settings = SanitizeSettings {
            excludes: vec!["**/*Test.class".into()],
            ..SanitizeSettings::default()
        };

        let outcome = sanitize_dump(dump, &store(&[(1, "com/example/Circle")]), &settings).unwrap();
        assert_eq!(outcome.bundle.name(), "shapes");
        assert_eq!(outcome.excluded, 1);
        assert_eq!(outcome.bundle.classes().len(), 1);
        assert_eq!(outcome.stats.classes, 1);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_sanitize_dump_collects_debug_warning() {
        let dump = AnalysisDump {
            bundle: None,
            classes: vec![class_dump(
                "Main",
                9,
                vec![MethodCoverage::new("main", "([Ljava/lang/String;)V").with_instructions(0, 7)],
            )],
        };

        let outcome = sanitize_dump(dump, &store(&[(9, "Main")]), &SanitizeSettings::default()).unwrap();
        assert_eq!(outcome.bundle.name(), DEFAULT_BUNDLE_NAME);
        assert_eq!(outcome.warnings, vec![ReportWarning::MissingDebugInformation]);
    }

    #[test]
    fn test_sanitize_dump_handles_maximal_counters() {
        let dump = AnalysisDump::from_json(
            r#"{"classes": [{"name": "a/Big", "id": 4, "methods": [
                {"name": "run", "desc": "()V",
                 "instructions": {"missed": 4294967295, "covered": 1},
                 "first_line": 2, "last_line": 3}
            ]}]}"#,
            std::path::Path::new("classes.json"),
        )
        .unwrap();

        let outcome = sanitize_dump(dump, &store(&[(4, "a/Big")]), &SanitizeSettings::default()).unwrap();
        let summary = outcome.bundle.summary();
        assert_eq!(summary.instructions.missed, u32::MAX);
        assert_eq!(summary.instructions.total(), u32::MAX);
        assert_eq!(outcome.bundle.classes()[0].method_names(), vec!["run"]);
    }

    #[test]
    fn test_skip_returns_before_reading_inputs() {
        let config = SanitizeConfig {
            classes: PathBuf::from("/nonexistent/classes.json"),
            exec: PathBuf::from("/nonexistent/exec.json"),
            skip: true,
            ..cli_config()
        };
        assert!(sanitize(config).is_ok());
    }

    #[test]
    fn test_missing_execution_data_is_not_an_error() {
        let config = SanitizeConfig {
            classes: PathBuf::from("/nonexistent/classes.json"),
            exec: PathBuf::from("/nonexistent/exec.json"),
            ..cli_config()
        };
        assert!(sanitize(config).is_ok());
    }
}
