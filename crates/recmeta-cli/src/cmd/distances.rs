//! Implementation of `recmeta distances <file> --field <field>`.
//!
//! Builds the entry set of one field, sorts it, and prints the Levenshtein
//! distance between every pair of distinct raw values. No normalization runs,
//! so the output shows what the edit-distance thresholds would see on
//! un-normalized data. JSON output also lists the records behind each value.
use recmeta_core::{EntrySet, Field, compute_distances};

use crate::cmd::stdout_error;
use crate::error::CliError;
use crate::format::{FormatterConfig, write_distances_human, write_json};
use crate::io::read_records;
use crate::{OutputFormat, PathOrStdin};

/// Runs the `distances` command.
///
/// # Errors
///
/// Returns [`CliError`] for unreadable inputs or a failed write to stdout.
pub fn run(
    file: &PathOrStdin,
    field: Field,
    format: OutputFormat,
    formatter: &FormatterConfig,
    max_file_size: u64,
) -> Result<(), CliError> {
    let records = read_records(file, max_file_size)?;
    let mut set = EntrySet::build(&records, field);
    set.sort();
    let matrix = compute_distances(&set);
    let values = set.values();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Human => write_distances_human(&mut out, field, &values, &matrix, formatter),
        OutputFormat::Json => write_json(
            &mut out,
            &serde_json::json!({
                "field": field,
                "values": values,
                "records": set.indexes(),
                "distances": matrix.rows(),
            }),
        ),
    }
    .map_err(|e| stdout_error(&e))
}
