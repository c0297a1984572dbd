//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use recmeta_core::Field;

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
#[derive(Clone, Debug)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

/// Output format for CLI commands.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, optionally colored output (default).
    Human,
    /// A single pretty-printed JSON document.
    Json,
}

/// Metadata field selector for `recmeta distances`.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FieldArg {
    /// Track titles.
    Title,
    /// Performing artists.
    Artist,
    /// Composers.
    Composer,
    /// Album names.
    Album,
    /// Genres, one value per listed genre.
    Genres,
}

impl From<FieldArg> for Field {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Title => Field::Title,
            FieldArg::Artist => Field::Artist,
            FieldArg::Composer => Field::Composer,
            FieldArg::Album => Field::Album,
            FieldArg::Genres => Field::Genres,
        }
    }
}

/// All top-level subcommands exposed by the `recmeta` binary.
#[derive(Subcommand)]
pub enum Command {
    /// Cluster metadata values and report probable errors and duplicates.
    Analyze {
        /// JSON array of recordings, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
        /// TOML analysis configuration. Built-in defaults when omitted.
        #[arg(long, short = 'c', value_name = "TOML")]
        config: Option<PathBuf>,
    },

    /// Print the edit-distance matrix of one field's raw values.
    Distances {
        /// JSON array of recordings, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
        /// Field whose values are compared.
        #[arg(long, value_enum)]
        field: FieldArg,
    },

    /// Validate a configuration file and print the effective configuration.
    Config {
        /// TOML analysis configuration. Prints the defaults when omitted.
        #[arg(long, short = 'c', value_name = "TOML")]
        config: Option<PathBuf>,
    },
}

/// Root CLI struct for the `recmeta` binary.
///
/// Global flags are marked `global = true` so clap accepts them after any
/// subcommand.
#[derive(Parser)]
#[command(
    name = "recmeta",
    version,
    about = "Music metadata clustering and duplicate detection",
    long_about = "Finds probable spelling errors in music library metadata.\n\
                  Clusters titles, artists, composers, albums and genres by\n\
                  normalization, word-set and edit-distance matching, and\n\
                  reports redundant copies of the same recording."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Output format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Only log errors to stderr (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log stage progress and timing to stderr (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Maximum input file size in bytes.
    ///
    /// Can also be set via the `RECMETA_MAX_FILE_SIZE` environment variable.
    /// Default: 67108864 (64 MB).
    #[arg(
        long,
        global = true,
        env = "RECMETA_MAX_FILE_SIZE",
        default_value = "67108864"
    )]
    pub max_file_size: u64,

    /// Disable ANSI color codes.
    ///
    /// Also respects the `NO_COLOR` environment variable per
    /// <https://no-color.org>.
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,
}

#[cfg(test)]
mod tests;
