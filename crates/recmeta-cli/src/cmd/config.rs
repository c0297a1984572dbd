//! Implementation of `recmeta config [--config <toml>]`.
//!
//! Validates a configuration file and prints the effective configuration,
//! every default filled in, as TOML (human mode) or JSON.
use std::io::Write as _;
use std::path::Path;

use crate::cmd::stdout_error;
use crate::error::CliError;
use crate::format::write_json;
use crate::io::load_config;
use crate::OutputFormat;

/// Runs the `config` command.
///
/// # Errors
///
/// Returns [`CliError`] when the file cannot be read (exit 2), does not parse
/// (exit 2) or fails validation (exit 1).
pub fn run(
    config_path: Option<&Path>,
    format: OutputFormat,
    max_file_size: u64,
) -> Result<(), CliError> {
    let config = load_config(config_path, max_file_size)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Human => {
            let text = config.to_toml_string().map_err(|e| CliError::IoError {
                source: "configuration".to_owned(),
                detail: e.to_string(),
            })?;
            out.write_all(text.as_bytes())
        }
        OutputFormat::Json => write_json(&mut out, &config),
    }
    .map_err(|e| stdout_error(&e))
}
