//! Boolean "close enough" relations over the entries of an [`EntrySet`] and
//! the merge step that consumes them.
//!
//! Both matchers reduce to the same shape: an n×n symmetric matrix over the
//! current entry positions, tagged with the reason string that goes into the
//! provenance log. [`EntrySet::merge_by_specified_matrices`] ORs any number of
//! such matrices, chains the resulting pairs through a [`UnionFind`] and folds
//! each component into one entry.
use serde::Serialize;

use crate::entry_set::EntrySet;
use crate::union_find::UnionFind;

/// Error returned when a matrix does not describe the entry set it is
/// applied to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    /// The matrix was computed over a different number of entries.
    #[error("matrix for {reason:?} has size {found}, entry set has {expected} entries")]
    DimensionMismatch {
        /// Reason string of the offending matrix.
        reason: String,
        /// Number of entries in the set.
        expected: usize,
        /// Size of the matrix.
        found: usize,
    },
}

/// A symmetric boolean relation over entry positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosenessMatrix {
    reason: String,
    size: usize,
    cells: Vec<bool>,
}

impl ClosenessMatrix {
    /// Creates an all-false `size`×`size` matrix tagged with `reason`.
    pub fn new(size: usize, reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            size,
            cells: vec![false; size * size],
        }
    }

    /// Marks `(i, j)` and `(j, i)`.
    pub fn set(&mut self, i: usize, j: usize, close: bool) {
        self.cells[i * self.size + j] = close;
        self.cells[j * self.size + i] = close;
    }

    /// Returns whether `(i, j)` is marked; out-of-range cells are `false`.
    pub fn get(&self, i: usize, j: usize) -> bool {
        if i >= self.size || j >= self.size {
            return false;
        }
        self.cells[i * self.size + j]
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Provenance reason attached to merges this matrix causes.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Number of marked unordered pairs, the diagonal excluded.
    pub fn pair_count(&self) -> usize {
        (0..self.size)
            .map(|i| ((i + 1)..self.size).filter(|&j| self.get(i, j)).count())
            .sum()
    }

    /// Returns `true` if at least one pair inside `positions` is marked.
    fn has_edge_within(&self, positions: &[usize]) -> bool {
        positions.iter().enumerate().any(|(k, &a)| {
            positions[k + 1..].iter().any(|&b| self.get(a, b))
        })
    }
}

impl EntrySet {
    /// Merges every pair of entries marked by at least one of `matrices`.
    ///
    /// Pairs chain transitively: the merge groups are the connected
    /// components of the OR of all matrices. Each group is folded into its
    /// first entry, which takes the longest value of the group. For every
    /// group, one [`crate::MergeReport`] is logged per matrix that has at least one
    /// marked pair inside it. Returns the canonical values of the merged
    /// groups.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::DimensionMismatch`] if any matrix size differs
    /// from the number of entries. Nothing is merged in that case.
    pub fn merge_by_specified_matrices(
        &mut self,
        matrices: &[ClosenessMatrix],
    ) -> Result<Vec<String>, MatrixError> {
        let n = self.len();
        if let Some(bad) = matrices.iter().find(|m| m.size() != n) {
            return Err(MatrixError::DimensionMismatch {
                reason: bad.reason().to_owned(),
                expected: n,
                found: bad.size(),
            });
        }

        let mut uf = UnionFind::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                if matrices.iter().any(|m| m.get(i, j)) {
                    uf.union(i, j);
                }
            }
        }
        let groups = uf.groups();
        if groups.is_empty() {
            return Ok(Vec::new());
        }

        let merged = self.merge_positions(&groups);
        for group in &merged {
            for matrix in matrices {
                if matrix.has_edge_within(&group.positions) {
                    self.push_report(group.report(matrix.reason()));
                }
            }
        }
        tracing::debug!(
            field = %self.field(),
            groups = merged.len(),
            "merged entries by closeness"
        );
        Ok(merged.into_iter().map(|g| g.value).collect())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::record::Field;

    fn set_of(values: &[&str]) -> EntrySet {
        EntrySet::from_values(Field::Artist, values.iter().map(|v| Some(*v)))
    }

    #[test]
    fn set_is_symmetric() {
        let mut m = ClosenessMatrix::new(3, "r");
        m.set(0, 2, true);
        assert!(m.get(2, 0));
        assert_eq!(m.pair_count(), 1);
        assert!(!m.get(5, 0), "out of range reads are false");
    }

    #[test]
    fn matrices_are_ored_and_chained() {
        let mut set = set_of(&["a", "b", "c", "d"]);
        let mut first = ClosenessMatrix::new(4, "first");
        first.set(0, 1, true);
        let mut second = ClosenessMatrix::new(4, "second");
        second.set(1, 2, true);

        let merged = set
            .merge_by_specified_matrices(&[first, second])
            .expect("sizes match");
        assert_eq!(merged.len(), 1);
        assert_eq!(set.len(), 2);
        assert_eq!(set.entries()[0].record_indices, vec![0, 1, 2]);

        let reasons: Vec<&str> = set
            .reports()
            .iter()
            .flat_map(|r| r.reasons.iter().map(String::as_str))
            .collect();
        assert_eq!(reasons, vec!["first", "second"], "one report per contributing matrix");
    }

    #[test]
    fn matrix_without_edges_in_group_adds_no_report() {
        let mut set = set_of(&["a", "b", "c", "d"]);
        let mut first = ClosenessMatrix::new(4, "first");
        first.set(0, 1, true);
        let mut second = ClosenessMatrix::new(4, "second");
        second.set(2, 3, true);

        set.merge_by_specified_matrices(&[first, second])
            .expect("sizes match");
        assert_eq!(set.len(), 2);
        assert_eq!(set.reports().len(), 2);
        assert_eq!(set.reports()[0].reasons, vec!["first".to_owned()]);
        assert_eq!(set.reports()[1].reasons, vec!["second".to_owned()]);
    }

    #[test]
    fn no_marked_pairs_is_a_no_op() {
        let mut set = set_of(&["a", "b"]);
        let before = set.clone();
        let merged = set
            .merge_by_specified_matrices(&[ClosenessMatrix::new(2, "r")])
            .expect("sizes match");
        assert!(merged.is_empty());
        assert_eq!(set, before);
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let mut set = set_of(&["a", "b"]);
        let err = set
            .merge_by_specified_matrices(&[ClosenessMatrix::new(3, "stale")])
            .expect_err("size 3 does not fit 2 entries");
        assert_eq!(
            err,
            MatrixError::DimensionMismatch {
                reason: "stale".to_owned(),
                expected: 2,
                found: 3,
            }
        );
    }
}
