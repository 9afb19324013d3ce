//! CLI argument definitions for fmtmap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use fmtmap_cli::logging::LogFormat;
use fmtmap_cli::steps::ColumnAssignment;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "fmtmap",
    version,
    about = "Render, parse and map values through named formats",
    long_about = "Render, parse and map values through named formats.\n\n\
                  Lookup tables and bins come from a JSON catalog; formats come from \
                  the built-in registry."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List registered formats and whether they round-trip exactly.
    Formats,

    /// Parse formatted text into values.
    Parse(ParseArgs),

    /// Render values through a format.
    Render(RenderArgs),

    /// Apply lookups, bins and formats to the columns of a CSV file.
    Apply(ApplyArgs),
}

#[derive(Args)]
pub struct ParseArgs {
    /// Format name (case-insensitive).
    #[arg(long = "format", short = 'f', value_name = "NAME")]
    pub format: String,

    /// Text to parse, one value per argument.
    #[arg(value_name = "TEXT", required = true)]
    pub texts: Vec<String>,
}

#[derive(Args)]
pub struct RenderArgs {
    /// Format name (case-insensitive).
    #[arg(long = "format", short = 'f', value_name = "NAME")]
    pub format: String,

    /// Values to render. Numbers, ISO dates and text are accepted.
    #[arg(value_name = "VALUE", required = true, allow_hyphen_values = true)]
    pub values: Vec<String>,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// CSV file with a header row.
    #[arg(long = "input", short = 'i', value_name = "CSV")]
    pub input: PathBuf,

    /// JSON catalog declaring lookup tables and bins.
    #[arg(long = "catalog", short = 'c', value_name = "JSON")]
    pub catalog: Option<PathBuf>,

    /// Parse a column with a format: COL=FORMAT or COL:TARGET=FORMAT.
    #[arg(long = "parse", value_name = "COL=FORMAT")]
    pub parse: Vec<ColumnAssignment>,

    /// Map a column through a catalog lookup table: COL=TABLE.
    #[arg(long = "lookup", value_name = "COL=TABLE")]
    pub lookup: Vec<ColumnAssignment>,

    /// Bin a column with a catalog bin spec: COL=BINS.
    #[arg(long = "bin", value_name = "COL=BINS")]
    pub bin: Vec<ColumnAssignment>,

    /// Render a column with a format: COL=FORMAT.
    #[arg(long = "render", value_name = "COL=FORMAT")]
    pub render: Vec<ColumnAssignment>,

    /// Write the result to a CSV file instead of printing a preview.
    #[arg(long = "output", short = 'o', value_name = "CSV")]
    pub output: Option<PathBuf>,

    /// Rows shown in the preview.
    #[arg(long = "rows", default_value_t = 20)]
    pub rows: usize,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
