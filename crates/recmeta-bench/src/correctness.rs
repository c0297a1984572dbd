//! Post-analysis invariant checkers for correctness validation.

use std::collections::HashSet;

use recmeta_core::{
    AnalysisConfig, AnalysisOutput, DistanceMatrix, DuplicateConfig, DuplicateResolution,
    EntrySet, Field, Recording, analyze, are_same_recording,
};

/// Fields whose entry sets must partition the records.
pub const SINGLE_VALUED: [Field; 4] = [Field::Title, Field::Artist, Field::Composer, Field::Album];

/// Verifies that every single-valued field in `output` holds each record in
/// exactly one entry.
pub fn check_partitions(output: &AnalysisOutput) -> Result<(), String> {
    for analysed in &output.fields {
        if !SINGLE_VALUED.contains(&analysed.field) {
            continue;
        }
        analysed
            .entries
            .check_partition(output.record_count)
            .map_err(|e| format!("{}: {e}", analysed.field))?;
    }
    Ok(())
}

/// Verifies that every merge report of `set` lies inside a single entry,
/// records and raw values alike.
pub fn check_reports_within_entries(set: &EntrySet) -> Result<(), String> {
    for report in set.reports() {
        let contained = set.entries().iter().any(|e| {
            report
                .indices
                .iter()
                .all(|i| e.record_indices.contains(i))
                && report.values.iter().all(|v| e.original_values.contains(v))
        });
        if !contained {
            return Err(format!(
                "{}: report {:?} ({:?}) spans several entries",
                set.field(),
                report.indices,
                report.reasons
            ));
        }
    }
    Ok(())
}

/// Verifies the probable-error clusters of every field:
/// - every cluster names at least two distinct raw values
/// - every cluster has at least one reason
/// - `affected_records` matches the index list
/// - no cluster's records and values are both nested inside another's
pub fn check_probable_errors(output: &AnalysisOutput) -> Result<(), String> {
    for analysed in &output.fields {
        let field = analysed.field;
        for cluster in &analysed.probable_errors {
            let distinct: HashSet<&String> = cluster.values.iter().collect();
            if distinct.len() < 2 {
                return Err(format!(
                    "{field}: cluster {:?} has fewer than two values",
                    cluster.values
                ));
            }
            if cluster.reasons.is_empty() {
                return Err(format!("{field}: cluster {:?} has no reason", cluster.values));
            }
            if cluster.affected_records != cluster.record_indices.len() {
                return Err(format!(
                    "{field}: affected_records {} != {} indices",
                    cluster.affected_records,
                    cluster.record_indices.len()
                ));
            }
        }
        for (i, a) in analysed.probable_errors.iter().enumerate() {
            for (j, b) in analysed.probable_errors.iter().enumerate() {
                let nested = a.record_indices.iter().all(|r| b.record_indices.contains(r))
                    && a.values.iter().all(|v| b.values.contains(v));
                if i != j && nested {
                    return Err(format!(
                        "{field}: cluster {:?} is nested in {:?}",
                        a.values, b.values
                    ));
                }
            }
        }
    }
    Ok(())
}

/// Verifies a duplicate resolution against the records it came from:
/// - every member of a group is related to the group's anchor
/// - no record belongs to two groups
/// - `affected_count` is the total size of the groups
pub fn check_duplicates(
    records: &[Recording],
    resolution: &DuplicateResolution,
    filters: &DuplicateConfig,
) -> Result<(), String> {
    let mut seen = HashSet::new();
    let mut total = 0;
    for group in &resolution.accepted {
        if group.records.len() < 2 {
            return Err(format!("group for {:?} has one record", group.title));
        }
        let anchor = records
            .get(group.records[0])
            .ok_or_else(|| format!("anchor {} out of range", group.records[0]))?;
        for &member in &group.records[1..] {
            let record = records
                .get(member)
                .ok_or_else(|| format!("member {member} out of range"))?;
            if !are_same_recording(anchor, record, filters) {
                return Err(format!(
                    "record {member} in group for {:?} does not match its anchor",
                    group.title
                ));
            }
        }
        for &member in &group.records {
            if !seen.insert(member) {
                return Err(format!("record {member} is in more than one group"));
            }
        }
        total += group.records.len();
    }
    if total != resolution.affected_count {
        return Err(format!(
            "affected_count {} != {total} grouped records",
            resolution.affected_count
        ));
    }
    for cluster in &resolution.rejected {
        if let Some(r) = cluster.rejected.iter().find(|r| seen.contains(r)) {
            return Err(format!("record {r} is both grouped and rejected"));
        }
    }
    Ok(())
}

/// Verifies that `matrix` is symmetric with a zero diagonal for present
/// entries and no distance for the absence entry.
pub fn check_distance_matrix(set: &EntrySet, matrix: &DistanceMatrix) -> Result<(), String> {
    if matrix.size() != set.len() {
        return Err(format!(
            "matrix size {} != {} entries",
            matrix.size(),
            set.len()
        ));
    }
    for (i, entry) in set.entries().iter().enumerate() {
        let diagonal = matrix.get(i, i);
        match (&entry.value, diagonal) {
            (Some(_), Some(0)) | (None, None) => {}
            (value, found) => {
                return Err(format!("diagonal {i} for {value:?} is {found:?}"));
            }
        }
        for j in (i + 1)..matrix.size() {
            if matrix.get(i, j) != matrix.get(j, i) {
                return Err(format!("matrix not symmetric at ({i}, {j})"));
            }
        }
    }
    Ok(())
}

/// Verifies that raising the absolute edit-distance threshold from `low`
/// to `high` never splits a cluster of `field`.
pub fn check_threshold_monotonicity(
    records: &[Recording],
    field: Field,
    low: u32,
    high: u32,
) -> Result<(), String> {
    let run = |threshold: u32| -> Result<EntrySet, String> {
        let mut config = AnalysisConfig::default();
        config.edit_distance.check_absolute = true;
        config.edit_distance.absolute_threshold = threshold;
        config.duplicates.enabled = false;
        let output = analyze(records, &config).map_err(|e| e.to_string())?;
        output
            .field(field)
            .map(|f| f.entries.clone())
            .ok_or_else(|| format!("{field} was not analysed"))
    };
    let coarse = run(high)?;
    let fine = run(low)?;
    for entry in fine.entries() {
        let together = coarse.entries().iter().any(|c| {
            entry
                .record_indices
                .iter()
                .all(|i| c.record_indices.contains(i))
        });
        if !together {
            return Err(format!(
                "{field}: threshold {high} split records {:?} joined at {low}",
                entry.record_indices
            ));
        }
    }
    Ok(())
}
