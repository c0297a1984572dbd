//! Entry cluster store: the partition of record indices for one field.
//!
//! An [`EntrySet`] holds one [`Entry`] per distinct current value of a field,
//! plus at most one absence entry collecting records where the field is
//! unknown. Normalization rewrites entry values in place; merges fold entries
//! whose values became equal (or were judged equivalent by a matcher) into a
//! single entry and append a [`MergeReport`] to the set's provenance log.
//!
//! Operations never reorder entries except [`EntrySet::sort`]. A merged group
//! keeps the position of its first entry.
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::merge_report::MergeReport;
use crate::pattern::Pattern;
use crate::record::{Field, Recording};

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// One canonical value and every record currently holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Current value, `None` for the absence entry.
    pub value: Option<String>,
    /// Record indices in insertion order. Never contains duplicates.
    pub record_indices: Vec<usize>,
    /// Distinct raw values folded into this entry, first seen first.
    pub original_values: Vec<String>,
}

impl Entry {
    /// Returns `true` for the absence entry.
    pub fn is_absent(&self) -> bool {
        self.value.is_none()
    }

    /// Number of records in this entry.
    pub fn len(&self) -> usize {
        self.record_indices.len()
    }

    /// Returns `true` if no record holds this entry.
    pub fn is_empty(&self) -> bool {
        self.record_indices.is_empty()
    }
}

/// Orders present values ordinally with the absence marker last.
fn compare_values(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// A `(before, after)` pair describing one rewritten entry value.
pub type ValueChange = (String, String);

/// Result of folding one group of entries into a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MergedGroup {
    /// Entry positions the group occupied before the merge.
    pub positions: Vec<usize>,
    /// Canonical value the group was given.
    pub value: String,
    /// Record indices of the merged entry.
    pub record_indices: Vec<usize>,
    /// Raw values of the merged entry.
    pub original_values: Vec<String>,
}

impl MergedGroup {
    /// Provenance for this merge under `reason`.
    pub fn report(&self, reason: &str) -> MergeReport {
        MergeReport::new(self.record_indices.iter().copied(), reason)
            .with_values(self.original_values.iter().cloned())
    }
}

/// A record index found in the wrong number of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionViolation {
    /// The record is not held by any entry.
    Missing {
        /// The record index.
        index: usize,
    },
    /// The record is held by more than one entry.
    Duplicated {
        /// The record index.
        index: usize,
    },
    /// An entry refers to a record index outside the record slice.
    OutOfRange {
        /// The record index.
        index: usize,
    },
}

impl std::fmt::Display for PartitionViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing { index } => write!(f, "record {index} is not in any entry"),
            Self::Duplicated { index } => write!(f, "record {index} is in more than one entry"),
            Self::OutOfRange { index } => write!(f, "record {index} is out of range"),
        }
    }
}

// ---------------------------------------------------------------------------
// EntrySet
// ---------------------------------------------------------------------------

/// The partition of record indices for one metadata field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySet {
    field: Field,
    entries: Vec<Entry>,
    reports: Vec<MergeReport>,
}

impl EntrySet {
    /// Builds one entry per distinct raw value of `field` across `records`.
    ///
    /// Records with no value go to a single absence entry placed after all
    /// present values. Identical raw values share an entry from the start and
    /// produce no merge report.
    pub fn build(records: &[Recording], field: Field) -> Self {
        let mut entries: Vec<Entry> = Vec::new();
        let mut position_of: HashMap<&str, usize> = HashMap::new();
        let mut absent: Vec<usize> = Vec::new();

        for (index, record) in records.iter().enumerate() {
            for value in record.values(field) {
                match value {
                    Some(value) => match position_of.get(value) {
                        Some(&pos) => push_unique(&mut entries[pos].record_indices, index),
                        None => {
                            position_of.insert(value, entries.len());
                            entries.push(Entry {
                                value: Some(value.to_owned()),
                                record_indices: vec![index],
                                original_values: vec![value.to_owned()],
                            });
                        }
                    },
                    None => push_unique(&mut absent, index),
                }
            }
        }

        if !absent.is_empty() {
            entries.push(Entry {
                value: None,
                record_indices: absent,
                original_values: Vec::new(),
            });
        }

        tracing::debug!(field = %field, entries = entries.len(), "built entry set");
        Self {
            field,
            entries,
            reports: Vec::new(),
        }
    }

    /// Builds an entry set directly from values, one record per value.
    ///
    /// Record `i` holds `values[i]`. Equal values share an entry. Mostly
    /// useful for exercising matchers on bare strings.
    pub fn from_values<'a>(field: Field, values: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        let records: Vec<Recording> = values
            .into_iter()
            .map(|v| {
                let v = v.map(str::to_owned);
                match field {
                    Field::Title => Recording {
                        title: v,
                        ..Recording::default()
                    },
                    Field::Artist => Recording {
                        artist: v,
                        ..Recording::default()
                    },
                    Field::Composer => Recording {
                        composer: v,
                        ..Recording::default()
                    },
                    Field::Album => Recording {
                        album: v,
                        ..Recording::default()
                    },
                    Field::Genres => Recording {
                        genres: v.map(|g| vec![g]),
                        ..Recording::default()
                    },
                }
            })
            .collect();
        Self::build(&records, field)
    }

    // -- queries -------------------------------------------------------------

    /// The field this set was built over.
    pub fn field(&self) -> Field {
        self.field
    }

    /// All entries in current order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The provenance log, oldest first.
    pub fn reports(&self) -> &[MergeReport] {
        &self.reports
    }

    /// Number of entries, the absence entry included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the set has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current entry values in order; `None` marks the absence entry.
    pub fn values(&self) -> Vec<Option<&str>> {
        self.entries.iter().map(|e| e.value.as_deref()).collect()
    }

    /// Record indices of each entry, in entry order.
    pub fn indexes(&self) -> Vec<&[usize]> {
        self.entries
            .iter()
            .map(|e| e.record_indices.as_slice())
            .collect()
    }

    /// Record indices of the absence entry, if there is one.
    pub fn indexes_of_absence_entries(&self) -> Option<&[usize]> {
        self.entries
            .iter()
            .find(|e| e.is_absent())
            .map(|e| e.record_indices.as_slice())
    }

    /// Entries that hold more than one record, in current order.
    pub fn multiple_entries(&self) -> Vec<&Entry> {
        self.entries.iter().filter(|e| e.len() > 1).collect()
    }

    /// Present values that start or end with whitespace.
    pub fn values_requiring_space_strip(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|e| e.value.as_deref())
            .filter(|v| v.trim() != *v)
            .collect()
    }

    /// The entry currently holding `record`, if any.
    pub fn entry_for_record(&self, record: usize) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|e| e.record_indices.contains(&record))
    }

    /// Checks that every index in `0..record_count` is held by exactly one
    /// entry.
    ///
    /// Only meaningful for single-valued fields; a genre set legitimately
    /// holds a record in several entries.
    ///
    /// # Errors
    ///
    /// Returns the first [`PartitionViolation`] found.
    pub fn check_partition(&self, record_count: usize) -> Result<(), PartitionViolation> {
        let mut seen = vec![false; record_count];
        for entry in &self.entries {
            for &index in &entry.record_indices {
                let Some(slot) = seen.get_mut(index) else {
                    return Err(PartitionViolation::OutOfRange { index });
                };
                if *slot {
                    return Err(PartitionViolation::Duplicated { index });
                }
                *slot = true;
            }
        }
        match seen.iter().position(|s| !s) {
            Some(index) => Err(PartitionViolation::Missing { index }),
            None => Ok(()),
        }
    }

    // -- ordering and rewriting ---------------------------------------------

    /// Sorts entries by value, absence last. Stable and idempotent.
    pub fn sort(&mut self) {
        self.entries
            .sort_by(|a, b| compare_values(a.value.as_deref(), b.value.as_deref()));
    }

    /// Case-folds every present value in place. Returns the values that
    /// changed.
    pub fn to_lower_case(&mut self) -> Vec<ValueChange> {
        let mut changes = Vec::new();
        for value in self.entries.iter_mut().filter_map(|e| e.value.as_mut()) {
            let lowered = value.to_lowercase();
            if lowered != *value {
                changes.push((std::mem::replace(value, lowered.clone()), lowered));
            }
        }
        changes
    }

    /// Replaces every match of `pattern` in every present value.
    ///
    /// A replacement that would leave a value empty is skipped for that
    /// entry. Entries are not merged; call [`EntrySet::merge_identical`]
    /// afterwards to fold values that became equal.
    pub fn find_and_replace(&mut self, pattern: &Pattern, replacement: &str) -> Vec<ValueChange> {
        let mut changes = Vec::new();
        for value in self.entries.iter_mut().filter_map(|e| e.value.as_mut()) {
            let after = pattern.replace_all(value, replacement);
            if after.is_empty() || after.as_ref() == value.as_str() {
                continue;
            }
            let after = after.into_owned();
            changes.push((std::mem::replace(value, after.clone()), after));
        }
        changes
    }

    /// Strips a leading run of digits and whitespace from each value.
    ///
    /// Values made only of digits and whitespace are left untouched.
    pub fn remove_leading_digits_and_spaces(&mut self) -> Vec<ValueChange> {
        let mut changes = Vec::new();
        for value in self.entries.iter_mut().filter_map(|e| e.value.as_mut()) {
            let stripped = value.trim_start_matches(|c: char| c.is_ascii_digit() || c.is_whitespace());
            if stripped.is_empty() || stripped.len() == value.len() {
                continue;
            }
            let after = stripped.to_owned();
            changes.push((std::mem::replace(value, after.clone()), after));
        }
        changes
    }

    // -- merging -------------------------------------------------------------

    /// Folds entries whose current values are exactly equal.
    ///
    /// When `log_provenance` is set, one [`MergeReport`] with `reason` is
    /// appended per group that actually merged. Returns the merged values,
    /// empty when nothing changed.
    pub fn merge_identical(&mut self, log_provenance: bool, reason: &str) -> Vec<String> {
        let mut group_of: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for (pos, entry) in self.entries.iter().enumerate() {
            let Some(value) = entry.value.as_deref() else {
                continue;
            };
            match group_of.get(value) {
                Some(&g) => groups[g].push(pos),
                None => {
                    group_of.insert(value, groups.len());
                    groups.push(vec![pos]);
                }
            }
        }
        groups.retain(|g| g.len() > 1);

        let merged = self.merge_positions(&groups);
        if log_provenance {
            for group in &merged {
                self.push_report(group.report(reason));
            }
        }
        if !merged.is_empty() {
            tracing::debug!(
                field = %self.field,
                groups = merged.len(),
                reason,
                "merged identical values"
            );
        }
        merged.into_iter().map(|g| g.value).collect()
    }

    /// Folds each group of entry positions into its first entry.
    ///
    /// Every group must list present entries in ascending position. The
    /// merged entry takes the longest value of the group (the first one on a
    /// tie) and receives the record indices of the other members in entry
    /// order. Groups of fewer than two positions are ignored.
    pub(crate) fn merge_positions(&mut self, groups: &[Vec<usize>]) -> Vec<MergedGroup> {
        let mut removed = vec![false; self.entries.len()];
        let mut merged = Vec::with_capacity(groups.len());

        for group in groups {
            let Some((&recipient, rest)) = group.split_first() else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }

            let mut canonical: Option<&str> = None;
            for &pos in group {
                if let Some(value) = self.entries[pos].value.as_deref() {
                    let longer = canonical
                        .is_none_or(|best| value.chars().count() > best.chars().count());
                    if longer {
                        canonical = Some(value);
                    }
                }
            }
            let Some(canonical) = canonical.map(str::to_owned) else {
                continue;
            };

            let mut indices = std::mem::take(&mut self.entries[recipient].record_indices);
            let mut held: HashSet<usize> = indices.iter().copied().collect();
            for &pos in rest {
                for index in std::mem::take(&mut self.entries[pos].record_indices) {
                    if held.insert(index) {
                        indices.push(index);
                    }
                }
                for original in std::mem::take(&mut self.entries[pos].original_values) {
                    if !self.entries[recipient].original_values.contains(&original) {
                        self.entries[recipient].original_values.push(original);
                    }
                }
                removed[pos] = true;
            }

            self.entries[recipient].value = Some(canonical.clone());
            self.entries[recipient].record_indices = indices.clone();
            merged.push(MergedGroup {
                positions: group.clone(),
                value: canonical,
                record_indices: indices,
                original_values: self.entries[recipient].original_values.clone(),
            });
        }

        if !merged.is_empty() {
            let mut pos = 0;
            self.entries.retain(|_| {
                let keep = !removed[pos];
                pos += 1;
                keep
            });
        }
        merged
    }

    /// Appends a report to the provenance log.
    pub(crate) fn push_report(&mut self, report: MergeReport) {
        self.reports.push(report);
    }
}

/// Pushes `index` unless it was the last one pushed.
///
/// Records are visited in ascending order, so a repeat can only come from the
/// same record listing a value twice.
fn push_unique(indices: &mut Vec<usize>, index: usize) {
    if indices.last() != Some(&index) {
        indices.push(index);
    }
}

#[cfg(test)]
mod tests;
