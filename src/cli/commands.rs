use crate::aggregator::PartialOrdering;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Generates Sass manifest files that import every partial beneath them
#[derive(Parser, Debug)]
#[command(
    name = "partialgen",
    about = "Generates Sass manifest files that import every partial beneath them",
    version,
    author,
    long_about = "partialgen finds every manifest file (__all.scss) matching a glob, collects \
                  the underscore-prefixed .scss partials in the manifest's directory and all \
                  sub-directories, and rewrites the manifest as a list of @import declarations. \
                  Run it before compiling styles."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Regenerate every manifest matching a pattern",
        long_about = "Finds manifest files matching PATTERN and rewrites each one from the \
                      partials beneath its directory. A failure on one manifest is reported \
                      but does not stop the others.\n\n\
                      Examples:\n  \
                      partialgen aggregate\n  \
                      partialgen aggregate 'assets/**/__all.scss'\n  \
                      partialgen aggregate --check --format json"
    )]
    Aggregate(AggregateArgs),

    #[command(
        about = "List the partials a scan root would import",
        long_about = "Runs partial discovery on DIR and prints each partial with the import \
                      identifier it would get. Nothing is written.\n\n\
                      Examples:\n  \
                      partialgen list src/scss\n  \
                      partialgen list src/scss --order filesystem --format yaml"
    )]
    List(ListArgs),

    #[command(about = "Show the effective configuration")]
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct AggregateArgs {
    #[arg(
        value_name = "PATTERN",
        help = "Glob selecting manifest files (defaults to PARTIALGEN_PATTERN or src/scss/**/__all.scss)"
    )]
    pub pattern: Option<String>,

    #[arg(
        long,
        help = "Do not write; exit with status 1 if any manifest is out of date"
    )]
    pub check: bool,

    #[arg(long, value_enum, help = "Import ordering (overrides PARTIALGEN_ORDER)")]
    pub order: Option<OrderArg>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    #[arg(value_name = "DIR", help = "Scan root to discover partials in")]
    pub root: PathBuf,

    #[arg(long, value_enum, help = "Import ordering (overrides PARTIALGEN_ORDER)")]
    pub order: Option<OrderArg>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    Sorted,
    Filesystem,
}

impl From<OrderArg> for PartialOrdering {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Sorted => PartialOrdering::Sorted,
            OrderArg::Filesystem => PartialOrdering::Filesystem,
        }
    }
}
