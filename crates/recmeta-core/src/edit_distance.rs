//! Levenshtein distances between entry values and the closeness metrics
//! derived from them.
//!
//! [`compute_distances`] fills an n×n matrix over the current entries of an
//! [`EntrySet`]. Each [`EditDistanceMetric`] turns that matrix into a
//! [`ClosenessMatrix`] using its own threshold; the metrics are then ORed by
//! [`EntrySet::merge_by_specified_matrices`].
//!
//! Lengths and distances count `char`s, so accented letters cost one edit.
use serde::{Deserialize, Serialize};

use crate::closeness::{ClosenessMatrix, MatrixError};
use crate::entry_set::EntrySet;

// ---------------------------------------------------------------------------
// Distance matrix
// ---------------------------------------------------------------------------

/// Symmetric matrix of edit distances between the entries of a set.
///
/// Cells touching the absence entry hold no distance; [`DistanceMatrix::sentinel`]
/// renders them as `-1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistanceMatrix {
    size: usize,
    cells: Vec<Option<usize>>,
    lengths: Vec<Option<usize>>,
}

impl DistanceMatrix {
    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Distance between entries `i` and `j`, `None` if either is absent or
    /// out of range.
    pub fn get(&self, i: usize, j: usize) -> Option<usize> {
        if i >= self.size || j >= self.size {
            return None;
        }
        self.cells[i * self.size + j]
    }

    /// Distance between entries `i` and `j` with `-1` standing for absence.
    pub fn sentinel(&self, i: usize, j: usize) -> i64 {
        self.get(i, j)
            .and_then(|d| i64::try_from(d).ok())
            .unwrap_or(-1)
    }

    /// Rows of [`DistanceMatrix::sentinel`] values, for reporting.
    pub fn rows(&self) -> Vec<Vec<i64>> {
        (0..self.size)
            .map(|i| (0..self.size).map(|j| self.sentinel(i, j)).collect())
            .collect()
    }

    /// Character length of entry `i`'s value, `None` for absence.
    pub fn value_len(&self, i: usize) -> Option<usize> {
        self.lengths.get(i).copied().flatten()
    }

    /// Builds the closeness matrix of `metric` at `threshold`.
    ///
    /// Pairs involving the absence entry are never close. The diagonal is
    /// left unmarked.
    pub fn closeness(&self, metric: EditDistanceMetric, threshold: u32) -> ClosenessMatrix {
        let mut matrix = ClosenessMatrix::new(self.size, metric.reason());
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                let (Some(distance), Some(a), Some(b)) =
                    (self.get(i, j), self.value_len(i), self.value_len(j))
                else {
                    continue;
                };
                if metric.is_close(distance, a, b, threshold) {
                    matrix.set(i, j, true);
                }
            }
        }
        matrix
    }
}

/// Computes the edit distance between every pair of entries of `set`.
///
/// O(n²) comparisons, each proportional to the product of the two value
/// lengths.
pub fn compute_distances(set: &EntrySet) -> DistanceMatrix {
    let values = set.values();
    let size = values.len();
    let lengths: Vec<Option<usize>> = values
        .iter()
        .map(|v| v.map(|s| s.chars().count()))
        .collect();
    let mut cells = vec![None; size * size];

    for (i, a) in values.iter().enumerate() {
        let Some(a) = a else { continue };
        cells[i * size + i] = Some(0);
        for (j, b) in values.iter().enumerate().skip(i + 1) {
            let Some(b) = b else { continue };
            let d = strsim::levenshtein(a, b);
            cells[i * size + j] = Some(d);
            cells[j * size + i] = Some(d);
        }
    }

    tracing::trace!(field = %set.field(), size, "computed edit distances");
    DistanceMatrix {
        size,
        cells,
        lengths,
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// A rule deciding whether an edit distance is small enough to merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditDistanceMetric {
    /// Raw distance compared to the threshold.
    Absolute,
    /// Distance as a percentage of the longer value's length.
    Proportional,
    /// Distance beyond the length difference, as a percentage of the shorter
    /// value's length. Small when one value is a truncation of the other.
    Subset,
}

impl EditDistanceMetric {
    /// Provenance reason for merges caused by this metric.
    pub fn reason(self) -> &'static str {
        match self {
            Self::Absolute => "Absolute edit distance",
            Self::Proportional => "Proportional edit distance",
            Self::Subset => "Subset edit distance",
        }
    }

    /// The score compared against the threshold, `None` when undefined.
    ///
    /// `len_a` and `len_b` are the character lengths of the two values.
    pub fn score(self, distance: usize, len_a: usize, len_b: usize) -> Option<usize> {
        let (longer, shorter) = if len_a >= len_b {
            (len_a, len_b)
        } else {
            (len_b, len_a)
        };
        match self {
            Self::Absolute => Some(distance),
            Self::Proportional => Some(proportional_percentage(distance, longer)),
            Self::Subset => subset_percentage(distance, longer, shorter),
        }
    }

    /// Returns `true` if the score is at or below `threshold`.
    pub fn is_close(self, distance: usize, len_a: usize, len_b: usize, threshold: u32) -> bool {
        self.score(distance, len_a, len_b)
            .is_some_and(|score| score <= threshold as usize)
    }
}

/// `100 * distance / longer`, truncated. Two empty values score 0.
pub fn proportional_percentage(distance: usize, longer: usize) -> usize {
    if longer == 0 {
        return 0;
    }
    100 * distance / longer
}

/// `100 * (distance - (longer - shorter)) / shorter`, truncated.
///
/// Returns `None` when the shorter value is empty.
pub fn subset_percentage(distance: usize, longer: usize, shorter: usize) -> Option<usize> {
    if shorter == 0 {
        return None;
    }
    let beyond_truncation = distance.saturating_sub(longer.saturating_sub(shorter));
    Some(100 * beyond_truncation / shorter)
}

impl EntrySet {
    /// Merges entries close under any of the given `(metric, threshold)`
    /// pairs.
    ///
    /// Computes the distance matrix once, builds one closeness matrix per
    /// metric and hands them to [`EntrySet::merge_by_specified_matrices`].
    /// Returns the merged values.
    ///
    /// # Errors
    ///
    /// Propagates [`MatrixError`] from the merge step.
    pub fn merge_by_edit_distance(
        &mut self,
        metrics: &[(EditDistanceMetric, u32)],
    ) -> Result<Vec<String>, MatrixError> {
        if metrics.is_empty() {
            return Ok(Vec::new());
        }
        let distances = compute_distances(self);
        let matrices: Vec<ClosenessMatrix> = metrics
            .iter()
            .map(|&(metric, threshold)| distances.closeness(metric, threshold))
            .collect();
        self.merge_by_specified_matrices(&matrices)
    }
}
