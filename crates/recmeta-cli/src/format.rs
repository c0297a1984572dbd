/// Human-readable and JSON rendering of analysis results.
///
/// Human mode writes one block per analysed field followed by the duplicate
/// groups. Field headers and merge reasons are colored when
/// [`FormatterConfig::colors`] is set. JSON mode writes the serialized
/// result as a single pretty-printed document.
use std::io::{IsTerminal as _, Write};
use std::time::Duration;

use recmeta_core::{AnalysisOutput, DistanceMatrix, DuplicateResolution, Field, FieldAnalysis};

// ---------------------------------------------------------------------------
// Color support detection
// ---------------------------------------------------------------------------

/// Returns `true` if ANSI color codes should be emitted to stdout.
///
/// Colors are off when `no_color_flag` is set, when the `NO_COLOR`
/// environment variable is present, or when stdout is not a TTY.
pub fn colors_enabled(no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stdout().is_terminal()
}

const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_CYAN: &str = "\x1b[36m";
const ANSI_RESET: &str = "\x1b[0m";

// ---------------------------------------------------------------------------
// FormatterConfig
// ---------------------------------------------------------------------------

/// Rendering options derived from the global CLI flags.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Whether ANSI colors are enabled.
    pub colors: bool,
    /// Omit per-field summaries and timing.
    pub quiet: bool,
    /// Emit timing to stderr.
    pub verbose: bool,
}

impl FormatterConfig {
    /// Constructs a [`FormatterConfig`] from the raw CLI flags.
    pub fn from_flags(no_color_flag: bool, quiet: bool, verbose: bool) -> Self {
        Self {
            colors: colors_enabled(no_color_flag),
            quiet,
            verbose,
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.colors {
            format!("{color}{text}{ANSI_RESET}")
        } else {
            text.to_owned()
        }
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}

/// Section heading for a field, e.g. `titles`.
fn heading(field: Field) -> &'static str {
    match field {
        Field::Title => "titles",
        Field::Artist => "artists",
        Field::Composer => "composers",
        Field::Album => "albums",
        Field::Genres => "genres",
    }
}

fn quoted_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("{v:?}"))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn index_list(indices: &[usize]) -> String {
    indices
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Analysis output
// ---------------------------------------------------------------------------

/// Writes a complete analysis in human-readable form.
///
/// ```text
/// artists: 4 values in 2 clusters
///   "Beethoven" | "Bethoven"  (2 records)
///     Absolute edit distance; Proportional edit distance
/// ```
///
/// # Errors
///
/// Returns an error only if writing to `w` fails.
pub fn write_analysis_human<W: Write>(
    w: &mut W,
    output: &AnalysisOutput,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if !config.quiet {
        writeln!(
            w,
            "{} {}",
            output.record_count,
            plural(output.record_count, "record", "records")
        )?;
    }
    for field in &output.fields {
        write_field_human(w, field, config)?;
    }
    if let Some(duplicates) = &output.duplicates {
        write_duplicates_human(w, duplicates, config)?;
    }
    Ok(())
}

fn write_field_human<W: Write>(
    w: &mut W,
    field: &FieldAnalysis,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    let distinct: usize = field
        .entries
        .entries()
        .iter()
        .map(|e| e.original_values.len())
        .sum();
    let clusters = field.entries.entries().iter().filter(|e| !e.is_absent()).count();
    writeln!(
        w,
        "{}: {distinct} {} in {clusters} {}",
        config.paint(ANSI_BOLD, heading(field.field)),
        plural(distinct, "value", "values"),
        plural(clusters, "cluster", "clusters"),
    )?;

    if field.probable_errors.is_empty() && !config.quiet {
        writeln!(w, "  no probable errors")?;
    }
    for cluster in &field.probable_errors {
        writeln!(
            w,
            "  {}  ({} {})",
            quoted_list(&cluster.values),
            cluster.affected_records,
            plural(cluster.affected_records, "record", "records"),
        )?;
        writeln!(
            w,
            "    {}",
            config.paint(ANSI_YELLOW, &cluster.reasons.join("; "))
        )?;
    }
    for value in &field.values_requiring_space_strip {
        writeln!(w, "  leading or trailing spaces: {value:?}")?;
    }
    if config.quiet {
        return Ok(());
    }
    for rewrite in &field.rewrites {
        writeln!(
            w,
            "  {}: {} {} rewritten, {} merged",
            rewrite.reason,
            rewrite.changes.len(),
            plural(rewrite.changes.len(), "value", "values"),
            rewrite.merged.len(),
        )?;
        if config.verbose {
            for (before, after) in &rewrite.changes {
                writeln!(w, "    {before:?} -> {after:?}")?;
            }
        }
    }
    Ok(())
}

fn write_duplicates_human<W: Write>(
    w: &mut W,
    duplicates: &DuplicateResolution,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    writeln!(
        w,
        "{}: {} {}, {} {} affected",
        config.paint(ANSI_BOLD, "duplicates"),
        duplicates.accepted.len(),
        plural(duplicates.accepted.len(), "group", "groups"),
        duplicates.affected_count,
        plural(duplicates.affected_count, "record", "records"),
    )?;
    for group in &duplicates.accepted {
        writeln!(
            w,
            "  {}  records {}",
            config.paint(ANSI_CYAN, &format!("{:?}", group.title)),
            index_list(&group.records)
        )?;
    }
    if config.quiet {
        return Ok(());
    }
    for cluster in &duplicates.rejected {
        writeln!(
            w,
            "  not duplicates: {:?}  records {}",
            cluster.title,
            index_list(&cluster.rejected)
        )?;
    }
    Ok(())
}

/// Writes any serializable result as pretty-printed JSON plus a newline.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write, T: serde::Serialize + ?Sized>(
    w: &mut W,
    value: &T,
) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, value)?;
    writeln!(w)
}

// ---------------------------------------------------------------------------
// Distances
// ---------------------------------------------------------------------------

/// Writes a numbered value list followed by the distance matrix.
///
/// Absent values print as `(none)` and their distances as `-1`.
///
/// # Errors
///
/// Returns an error only if writing to `w` fails.
pub fn write_distances_human<W: Write>(
    w: &mut W,
    field: Field,
    values: &[Option<&str>],
    matrix: &DistanceMatrix,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    writeln!(w, "{}", config.paint(ANSI_BOLD, heading(field)))?;
    for (i, value) in values.iter().enumerate() {
        match value {
            Some(v) => writeln!(w, "  [{i}] {v:?}")?,
            None => writeln!(w, "  [{i}] (none)")?,
        }
    }
    let width = matrix
        .rows()
        .iter()
        .flatten()
        .map(|d| d.to_string().len())
        .max()
        .unwrap_or(1);
    for row in matrix.rows() {
        let cells: Vec<String> = row.iter().map(|d| format!("{d:>width$}")).collect();
        writeln!(w, "  {}", cells.join(" "))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Writes timing information in verbose mode. No-op otherwise.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_timing_human<W: Write>(
    writer: &mut W,
    label: &str,
    duration: Duration,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if !config.verbose {
        return Ok(());
    }
    writeln!(writer, "{label} in {}ms", duration.as_millis())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
