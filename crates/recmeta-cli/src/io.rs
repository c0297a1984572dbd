/// Input reading for the `recmeta` binary.
///
/// `recmeta-core` never touches the filesystem; every byte it sees comes
/// through here.
///
/// - Disk files: size checked via `std::fs::metadata` before any read.
/// - Stdin: read through `Read::take` so allocation is bounded.
/// - UTF-8 validated with the byte offset of the first bad sequence.
/// - Records are a JSON array of recordings; configurations are TOML.
use std::io::Read as _;
use std::path::Path;

use recmeta_core::{AnalysisConfig, ConfigError, Recording};

use crate::PathOrStdin;
use crate::error::CliError;

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// Reads the entire contents of `source` into a `String`.
///
/// # Errors
///
/// Returns a [`CliError`] with exit code 2 if the source is missing,
/// unreadable, larger than `max_size` or not valid UTF-8.
pub fn read_input(source: &PathOrStdin, max_size: u64) -> Result<String, CliError> {
    match source {
        PathOrStdin::Path(path) => read_file(path, max_size),
        PathOrStdin::Stdin => read_stdin(max_size),
    }
}

/// Reads a disk file, enforcing the size limit and UTF-8 requirement.
fn read_file(path: &Path, max_size: u64) -> Result<String, CliError> {
    let file_size = std::fs::metadata(path)
        .map_err(|e| io_error_to_cli(&e, path))?
        .len();

    if file_size > max_size {
        return Err(CliError::FileTooLarge {
            source: path.display().to_string(),
            limit: max_size,
            actual: Some(file_size),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| io_error_to_cli(&e, path))?;
    bytes_to_string(bytes, &path.display().to_string())
}

/// Maps a `std::io::Error` from a disk-file operation to a [`CliError`].
fn io_error_to_cli(e: &std::io::Error, path: &Path) -> CliError {
    let kind = e.kind();
    if kind == std::io::ErrorKind::NotFound {
        CliError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else if kind == std::io::ErrorKind::PermissionDenied {
        CliError::PermissionDenied {
            path: path.to_path_buf(),
        }
    } else {
        CliError::IoError {
            source: path.display().to_string(),
            detail: e.to_string(),
        }
    }
}

/// Reads the entire stdin stream, capped at `max_size` bytes.
///
/// One byte past the cap is requested so a stream of exactly `max_size`
/// bytes is accepted and a longer one is not.
fn read_stdin(max_size: u64) -> Result<String, CliError> {
    let stdin = std::io::stdin();
    let mut limited = stdin.lock().take(max_size.saturating_add(1));
    let mut buf: Vec<u8> = Vec::new();

    limited
        .read_to_end(&mut buf)
        .map_err(|e| CliError::StdinReadError {
            detail: e.to_string(),
        })?;

    if u64::try_from(buf.len()).is_ok_and(|n| n > max_size) {
        return Err(CliError::FileTooLarge {
            source: "-".to_owned(),
            limit: max_size,
            actual: None,
        });
    }

    bytes_to_string(buf, "-")
}

/// Converts a byte buffer to a `String`, reporting the offset of the first
/// invalid sequence on failure.
fn bytes_to_string(bytes: Vec<u8>, source_label: &str) -> Result<String, CliError> {
    String::from_utf8(bytes).map_err(|e| CliError::InvalidUtf8 {
        source: source_label.to_owned(),
        byte_offset: e.utf8_error().valid_up_to(),
    })
}

/// Display label for `source` in error messages.
pub fn source_label(source: &PathOrStdin) -> String {
    match source {
        PathOrStdin::Path(path) => path.display().to_string(),
        PathOrStdin::Stdin => "-".to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Parses `content` as a JSON array of recordings.
///
/// # Errors
///
/// Returns [`CliError::InvalidRecords`] with the parser's line and column.
pub fn parse_records(content: &str, source_label: &str) -> Result<Vec<Recording>, CliError> {
    serde_json::from_str(content).map_err(|e| CliError::InvalidRecords {
        source: source_label.to_owned(),
        detail: format!("line {}, column {}: {e}", e.line(), e.column()),
    })
}

/// Reads and parses the recordings in `source`.
///
/// # Errors
///
/// Any error of [`read_input`] or [`parse_records`].
pub fn read_records(source: &PathOrStdin, max_size: u64) -> Result<Vec<Recording>, CliError> {
    let content = read_input(source, max_size)?;
    let records = parse_records(&content, &source_label(source))?;
    tracing::debug!(source = %source_label(source), records = records.len(), "read records");
    Ok(records)
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Parses and validates a TOML configuration.
///
/// # Errors
///
/// - [`CliError::InvalidConfig`] (exit 2) when the TOML does not parse.
/// - [`CliError::ConfigRejected`] (exit 1) when it parses but fails
///   validation.
pub fn parse_config(content: &str, source_label: &str) -> Result<AnalysisConfig, CliError> {
    AnalysisConfig::from_toml_str(content).map_err(|e| config_error_to_cli(e, source_label))
}

/// Loads the configuration at `path`, or the defaults when `path` is `None`.
///
/// # Errors
///
/// Any error of [`read_input`] or [`parse_config`].
pub fn load_config(path: Option<&Path>, max_size: u64) -> Result<AnalysisConfig, CliError> {
    let Some(path) = path else {
        return Ok(AnalysisConfig::default());
    };
    let source = PathOrStdin::Path(path.to_path_buf());
    let content = read_input(&source, max_size)?;
    parse_config(&content, &path.display().to_string())
}

/// Maps a [`ConfigError`] to the exit-code class it belongs to.
pub fn config_error_to_cli(e: ConfigError, source_label: &str) -> CliError {
    match e {
        ConfigError::Parse(inner) => CliError::InvalidConfig {
            source: source_label.to_owned(),
            detail: inner.message().trim_end().to_owned(),
        },
        other @ (ConfigError::FractionOutOfRange { .. }
        | ConfigError::Pattern(_)
        | ConfigError::EmptyPattern { .. }) => CliError::ConfigRejected {
            detail: other.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
