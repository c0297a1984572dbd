/// CLI error types with associated exit codes.
///
/// [`CliError`] is the top-level error type for the `recmeta` binary. Every
/// variant maps to a stable exit code via [`CliError::exit_code`]:
///
/// - Exit code **2**: input failure. The records or the configuration could
///   not be read or parsed; no analysis ran.
/// - Exit code **1**: logical failure. The input was readable but the
///   configuration was rejected, or the analysis itself failed.
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions that the `recmeta` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read a file.
    PermissionDenied {
        /// The path that could not be read.
        path: PathBuf,
    },

    /// The input exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// `"-"` for stdin, otherwise the filesystem path.
        source: String,
        /// The configured size limit in bytes.
        limit: u64,
        /// The actual size in bytes, known for disk files only.
        actual: Option<u64>,
    },

    /// The input bytes are not valid UTF-8.
    InvalidUtf8 {
        /// `"-"` for stdin, otherwise the filesystem path.
        source: String,
        /// The byte offset of the first invalid byte sequence.
        byte_offset: usize,
    },

    /// An I/O error occurred while reading from stdin.
    StdinReadError {
        /// The underlying I/O error message.
        detail: String,
    },

    /// An I/O error not covered by the variants above.
    IoError {
        /// The file, stream or `"stdout"` involved.
        source: String,
        /// The underlying I/O error message.
        detail: String,
    },

    /// The records input is not a JSON array of recordings.
    InvalidRecords {
        /// `"-"` for stdin, otherwise the filesystem path.
        source: String,
        /// Parser message including line and column.
        detail: String,
    },

    /// The configuration file is not valid TOML for an analysis config.
    InvalidConfig {
        /// The configuration path.
        source: String,
        /// Parser message.
        detail: String,
    },

    // --- Exit code 1: logical failures ---
    /// The configuration parsed but failed validation.
    ConfigRejected {
        /// The validation message.
        detail: String,
    },

    /// The analysis stopped on an internal error.
    AnalysisFailed {
        /// The error message.
        detail: String,
    },
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidUtf8 { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::InvalidRecords { .. }
            | Self::InvalidConfig { .. } => 2,

            Self::ConfigRejected { .. } | Self::AnalysisFailed { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => {
                format!("error: file too large: {source} exceeded limit of {limit} bytes")
            }
            Self::InvalidUtf8 {
                source,
                byte_offset,
            } => {
                format!(
                    "error: invalid UTF-8 in {source}: first invalid byte at offset {byte_offset}"
                )
            }
            Self::StdinReadError { detail } => {
                format!("error: failed to read stdin: {detail}")
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error on {source}: {detail}")
            }
            Self::InvalidRecords { source, detail } => {
                format!("error: invalid records in {source}: {detail}")
            }
            Self::InvalidConfig { source, detail } => {
                format!("error: invalid configuration in {source}: {detail}")
            }
            Self::ConfigRejected { detail } => {
                format!("error: configuration rejected: {detail}")
            }
            Self::AnalysisFailed { detail } => {
                format!("error: analysis failed: {detail}")
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    // ── exit_code ────────────────────────────────────────────────────────────

    #[test]
    fn read_failures_are_exit_2() {
        let errors = [
            CliError::FileNotFound {
                path: PathBuf::from("library.json"),
            },
            CliError::PermissionDenied {
                path: PathBuf::from("/root/library.json"),
            },
            CliError::FileTooLarge {
                source: "big.json".to_owned(),
                limit: 1024,
                actual: Some(2048),
            },
            CliError::InvalidUtf8 {
                source: "bad.json".to_owned(),
                byte_offset: 42,
            },
            CliError::StdinReadError {
                detail: "broken pipe".to_owned(),
            },
            CliError::IoError {
                source: "library.json".to_owned(),
                detail: "device full".to_owned(),
            },
        ];
        for e in &errors {
            assert_eq!(e.exit_code(), 2, "{e}");
        }
    }

    #[test]
    fn parse_failures_are_exit_2() {
        let records = CliError::InvalidRecords {
            source: "-".to_owned(),
            detail: "expected `[` at line 1 column 1".to_owned(),
        };
        let config = CliError::InvalidConfig {
            source: "strict.toml".to_owned(),
            detail: "unknown field `ignore_cases`".to_owned(),
        };
        assert_eq!(records.exit_code(), 2);
        assert_eq!(config.exit_code(), 2);
    }

    #[test]
    fn rejected_config_is_exit_1() {
        let e = CliError::ConfigRejected {
            detail: "word_subset_fraction_match must be between 0 and 1, got 2".to_owned(),
        };
        assert_eq!(e.exit_code(), 1);
    }

    #[test]
    fn analysis_failure_is_exit_1() {
        let e = CliError::AnalysisFailed {
            detail: "matrix size mismatch".to_owned(),
        };
        assert_eq!(e.exit_code(), 1);
    }

    // ── message content ──────────────────────────────────────────────────────

    #[test]
    fn file_not_found_message_contains_path() {
        let e = CliError::FileNotFound {
            path: PathBuf::from("library.json"),
        };
        let msg = e.message();
        assert!(msg.contains("library.json"), "message: {msg}");
        assert!(msg.contains("not found"), "message: {msg}");
    }

    #[test]
    fn file_too_large_with_actual_mentions_sizes() {
        let e = CliError::FileTooLarge {
            source: "big.json".to_owned(),
            limit: 1_000_000,
            actual: Some(2_000_000),
        };
        let msg = e.message();
        assert!(msg.contains("2000000"), "message: {msg}");
        assert!(msg.contains("1000000"), "message: {msg}");
    }

    #[test]
    fn file_too_large_without_actual_mentions_limit() {
        let e = CliError::FileTooLarge {
            source: "-".to_owned(),
            limit: 512,
            actual: None,
        };
        assert!(e.message().contains("512"));
    }

    #[test]
    fn invalid_records_message_names_source() {
        let e = CliError::InvalidRecords {
            source: "library.json".to_owned(),
            detail: "line 3, column 7: missing field".to_owned(),
        };
        let msg = e.message();
        assert!(msg.contains("library.json"), "message: {msg}");
        assert!(msg.contains("line 3"), "message: {msg}");
    }

    #[test]
    fn display_matches_message() {
        let e = CliError::ConfigRejected {
            detail: "custom rule 0 has an empty pattern".to_owned(),
        };
        assert_eq!(format!("{e}"), e.message());
    }

    #[test]
    fn error_trait_is_implemented() {
        let e: Box<dyn std::error::Error> = Box::new(CliError::AnalysisFailed {
            detail: "x".to_owned(),
        });
        assert!(!e.to_string().is_empty());
    }
}
