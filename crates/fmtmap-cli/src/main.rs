//! fmtmap command-line tool.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use fmtmap_cli::logging::{LogConfig, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command};
use crate::commands::{run_apply, run_formats, run_parse, run_render};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match &cli.command {
        Command::Formats => run_formats(),
        Command::Parse(args) => run_parse(args),
        Command::Render(args) => run_render(args),
        Command::Apply(args) => run_apply(args),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Logging settings from the global flags.
///
/// An explicit `--log-level` or `-v`/`-q` disables `RUST_LOG`; file output never uses ANSI.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let explicit = cli.verbosity.is_present() || cli.log_level.is_some();
    LogConfig {
        level_filter: cli
            .log_level
            .map_or_else(|| cli.verbosity.tracing_level_filter(), LevelFilter::from),
        use_env_filter: !explicit,
        format: cli.log_format.into(),
        with_ansi: match cli.color.color {
            ColorChoice::Always => cli.log_file.is_none(),
            ColorChoice::Never => false,
            ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
        },
        log_file: cli.log_file.clone(),
        ..LogConfig::default()
    }
}
