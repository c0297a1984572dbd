//! Implementation of `recmeta analyze <file> [--config <toml>]`.
//!
//! Loads the configuration (defaults when none is given), reads the records,
//! runs the full analysis and prints the probable-error clusters of every
//! selected field followed by the duplicate groups.
//!
//! Exit codes: 0 = success, 1 = configuration rejected or analysis failed,
//! 2 = unreadable or malformed input.
use std::path::Path;
use std::time::Instant;

use recmeta_core::{AnalysisError, analyze};

use crate::cmd::stdout_error;
use crate::error::CliError;
use crate::format::{FormatterConfig, write_analysis_human, write_json, write_timing_human};
use crate::io::{load_config, read_records};
use crate::{OutputFormat, PathOrStdin};

/// Runs the `analyze` command.
///
/// # Errors
///
/// Returns [`CliError`] for unreadable inputs, a rejected configuration or a
/// failed write to stdout.
pub fn run(
    file: &PathOrStdin,
    config_path: Option<&Path>,
    format: OutputFormat,
    formatter: &FormatterConfig,
    max_file_size: u64,
) -> Result<(), CliError> {
    let config = load_config(config_path, max_file_size)?;
    let records = read_records(file, max_file_size)?;

    let started = Instant::now();
    let output = analyze(&records, &config).map_err(analysis_error_to_cli)?;
    let elapsed = started.elapsed();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Human => write_analysis_human(&mut out, &output, formatter),
        OutputFormat::Json => write_json(&mut out, &output),
    }
    .map_err(|e| stdout_error(&e))?;

    write_timing_human(&mut std::io::stderr(), "analysed", elapsed, formatter).map_err(|e| {
        CliError::IoError {
            source: "stderr".to_owned(),
            detail: e.to_string(),
        }
    })
}

fn analysis_error_to_cli(e: AnalysisError) -> CliError {
    match e {
        AnalysisError::Config(inner) => CliError::ConfigRejected {
            detail: inner.to_string(),
        },
        AnalysisError::Matrix(inner) => CliError::AnalysisFailed {
            detail: inner.to_string(),
        },
    }
}
