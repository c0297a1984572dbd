mod cli;
mod cmd;
mod error;
mod format;
mod io;

use std::io::IsTerminal as _;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub use cli::{Cli, Command, OutputFormat, PathOrStdin};

use crate::error::CliError;
use crate::format::FormatterConfig;

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(e) = run(&cli) {
        tracing::debug!(exit_code = e.exit_code(), "command failed");
        eprintln!("{}", e.message());
        std::process::exit(e.exit_code());
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the level follows the verbosity flags:
/// `error` with `--quiet`, `debug` with `--verbose`, `warn` by default.
fn init_tracing(cli: &Cli) {
    let default_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let ansi = !cli.no_color && std::io::stderr().is_terminal();

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(ansi)
                .with_target(false),
        )
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let formatter = FormatterConfig::from_flags(cli.no_color, cli.quiet, cli.verbose);
    match &cli.command {
        Command::Analyze { file, config } => cmd::analyze::run(
            file,
            config.as_deref(),
            cli.format,
            &formatter,
            cli.max_file_size,
        ),
        Command::Distances { file, field } => cmd::distances::run(
            file,
            (*field).into(),
            cli.format,
            &formatter,
            cli.max_file_size,
        ),
        Command::Config { config } => {
            cmd::config::run(config.as_deref(), cli.format, cli.max_file_size)
        }
    }
}
