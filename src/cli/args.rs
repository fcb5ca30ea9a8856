use crate::io::ReportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "covsan")]
#[command(about = "Coverage sanitizer for compiler-synthesized JVM methods", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sanitize analyzed classes against execution data and write a report
    Sanitize {
        /// Class analysis dump (JSON)
        #[arg(long)]
        classes: PathBuf,

        /// Execution data dump (JSON)
        #[arg(long = "exec", visible_alias = "data-file")]
        exec: PathBuf,

        /// Filters to enable (MIXIN, CASE)
        #[arg(long = "filter", value_delimiter = ',')]
        filters: Option<Vec<String>>,

        /// Class file patterns to include
        #[arg(long = "include", value_delimiter = ',')]
        includes: Option<Vec<String>>,

        /// Class file patterns to exclude
        #[arg(long = "exclude", value_delimiter = ',')]
        excludes: Option<Vec<String>>,

        /// Source extension that enables the synthetic-name rule
        #[arg(long = "source-extension")]
        source_extension: Option<String>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<ReportFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Bundle name shown in the report
        #[arg(long)]
        bundle: Option<String>,

        /// Config file to use instead of searching for .covsan.toml
        #[arg(long)]
        config: Option<PathBuf>,

        /// Skip the run without producing a report
        #[arg(long)]
        skip: bool,
    },

    /// Initialize a .covsan.toml configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    Cli::parse()
}
