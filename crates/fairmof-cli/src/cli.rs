use clap::{Args, Parser, Subcommand};
use fairmof::core::io::StructureFormat;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "FAIR-MOF CLI - Extract metal-organic framework structures, building units and pore properties from NOMAD archives.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to analyse archives in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract frameworks, building units and properties from downloaded archives.
    Extract(ExtractArgs),
    /// Summarize a single archive without writing anything.
    Inspect(InspectArgs),
    /// Export an accumulated property store as CSV.
    Export(ExportArgs),
}

/// Arguments for the `extract` subcommand.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Archive JSON files (bare archive, entry download or API query response).
    #[arg(required = true, value_name = "ARCHIVE")]
    pub archives: Vec<PathBuf>,

    /// Root directory for structure files and result stores.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Structure file format for written frameworks.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<StructureFormat>,

    /// Topology label that marks the framework entry.
    #[arg(long, value_name = "LABEL")]
    pub framework_label: Option<String>,

    /// Use this identifier instead of deriving one from the archive.
    /// Only valid with a single archive.
    #[arg(long, value_name = "ID")]
    pub identifier: Option<String>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S output.format=xyz
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Archive JSON file to summarize.
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Topology label that marks the framework entry.
    #[arg(long, value_name = "LABEL", default_value = "MOF")]
    pub framework_label: String,
}

/// Arguments for the `export` subcommand.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Property store written by `extract` (e.g. mof_properties.json).
    #[arg(value_name = "PROPERTIES_JSON")]
    pub store: PathBuf,

    /// Destination CSV file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_accepts_many_archives_and_overrides() {
        let cli = Cli::parse_from([
            "fairmof", "-vv", "extract", "a.json", "b.json", "-o", "out", "--format", "xyz",
            "-S", "framework-label=MOF",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Extract(args) = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(args.archives.len(), 2);
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert_eq!(args.format, Some(StructureFormat::Xyz));
        assert_eq!(args.set_values, vec!["framework-label=MOF".to_string()]);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["fairmof", "-q", "-v", "inspect", "a.json"]).is_err());
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["fairmof", "extract", "a.json", "--format", "pdb"]).is_err());
    }
}
