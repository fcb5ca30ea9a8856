use anyhow::Result;
use covsan::cli::{self, Commands};
use covsan::commands::{self, SanitizeConfig};

fn main() -> Result<()> {
    let cli = cli::parse_args();
    cli::init_logging(cli.verbosity);

    match cli.command {
        Commands::Sanitize {
            classes,
            exec,
            filters,
            includes,
            excludes,
            source_extension,
            format,
            output,
            bundle,
            config,
            skip,
        } => commands::sanitize(SanitizeConfig {
            classes,
            exec,
            filters,
            includes,
            excludes,
            source_extension,
            format,
            output,
            bundle,
            config,
            skip,
        }),
        Commands::Init { force } => commands::init_config(force),
    }
}
