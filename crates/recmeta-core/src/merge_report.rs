//! Merge provenance: which record indices were judged equivalent and why.
use serde::{Deserialize, Serialize};

/// Provenance for one merge that changed an [`crate::EntrySet`] partition.
///
/// `indices` is kept sorted and free of duplicates so that subset checks
/// during [`consolidate`] are cheap. `values` are the distinct raw values of
/// the entry the merge produced, also sorted. They tie the report to that
/// entry: a genre set holds a record in several entries, so indices alone
/// cannot tell two of its merges apart. `reasons` keeps insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    /// Record indices now considered equivalent.
    pub indices: Vec<usize>,
    /// Raw values folded together by the merge.
    #[serde(default)]
    pub values: Vec<String>,
    /// Human-readable reasons that justified the merge, oldest first.
    pub reasons: Vec<String>,
}

impl MergeReport {
    /// Creates a report for `indices` with a single reason and no values.
    pub fn new(indices: impl IntoIterator<Item = usize>, reason: impl Into<String>) -> Self {
        let mut indices: Vec<usize> = indices.into_iter().collect();
        indices.sort_unstable();
        indices.dedup();
        Self {
            indices,
            values: Vec::new(),
            reasons: vec![reason.into()],
        }
    }

    /// Attaches the raw values of the merged entry.
    #[must_use]
    pub fn with_values(mut self, values: impl IntoIterator<Item = String>) -> Self {
        self.values = values.into_iter().collect();
        self.values.sort();
        self.values.dedup();
        self
    }

    /// Number of record indices covered by this report.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if the report covers no records.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns `true` if every index and every value of `self` is also in
    /// `other`.
    pub fn is_subset_of(&self, other: &MergeReport) -> bool {
        self.indices
            .iter()
            .all(|i| other.indices.binary_search(i).is_ok())
            && self
                .values
                .iter()
                .all(|v| other.values.binary_search(v).is_ok())
    }

    /// Removes repeated reasons, keeping the first occurrence of each.
    pub fn dedup_reasons(&mut self) {
        let mut seen: Vec<String> = Vec::with_capacity(self.reasons.len());
        for reason in self.reasons.drain(..) {
            if !seen.contains(&reason) {
                seen.push(reason);
            }
        }
        self.reasons = seen;
    }
}

/// Absorbs every report whose indices and values are contained in another
/// report's.
///
/// The absorbed report's reasons are appended to the superset's, then each
/// surviving report has its reasons deduplicated. When two reports cover the
/// same indices and values, the earlier one survives. Survivors keep their relative order.
pub fn consolidate(reports: &[MergeReport]) -> Vec<MergeReport> {
    let mut slots: Vec<Option<MergeReport>> = reports.iter().cloned().map(Some).collect();

    for i in 0..slots.len() {
        let target = {
            let Some(candidate) = slots[i].as_ref() else {
                continue;
            };
            (0..slots.len()).find(|&j| {
                j != i
                    && slots[j].as_ref().is_some_and(|other| {
                        candidate.is_subset_of(other)
                            && (candidate.len() < other.len()
                                || candidate.values.len() < other.values.len()
                                || j < i)
                    })
            })
        };
        if let Some(j) = target {
            let absorbed = slots[i].take();
            if let (Some(absorbed), Some(superset)) = (absorbed, slots[j].as_mut()) {
                superset.reasons.extend(absorbed.reasons);
                superset.values.extend(absorbed.values);
                superset.values.sort();
                superset.values.dedup();
            }
        }
    }

    slots
        .into_iter()
        .flatten()
        .map(|mut report| {
            report.dedup_reasons();
            report
        })
        .collect()
}
