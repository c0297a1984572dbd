//! Word-order-insensitive matching of entry values.
//!
//! Values are split on whitespace into word sets. Two values match when the
//! share of common words reaches a threshold. In [`WordMatchMode::Ordering`]
//! the share is taken over the larger word set, so the values must contain
//! mostly the same words in any order. In [`WordMatchMode::Subset`] it is
//! taken over the smaller set, so a value whose words are all contained in a
//! longer one matches it.
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::closeness::{ClosenessMatrix, MatrixError};
use crate::entry_set::EntrySet;

/// Which word count the shared-word fraction is divided by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordMatchMode {
    /// Divide by the larger word count.
    Ordering,
    /// Divide by the smaller word count.
    Subset,
}

impl WordMatchMode {
    /// Provenance reason for merges made in this mode.
    pub fn reason(self) -> &'static str {
        match self {
            Self::Ordering => "Word ordering",
            Self::Subset => "Word subset",
        }
    }
}

/// Whitespace-delimited words of one value, in order and as a set.
#[derive(Debug, Clone)]
struct Words<'a> {
    sequence: Vec<&'a str>,
    set: HashSet<&'a str>,
}

impl<'a> Words<'a> {
    fn new(value: &'a str) -> Self {
        let sequence: Vec<&str> = value.split_whitespace().collect();
        let set = sequence.iter().copied().collect();
        Self { sequence, set }
    }
}

/// Returns the fraction of shared words between `a` and `b`.
///
/// Returns `None` when the denominator is zero, which happens when either
/// value has no words.
pub fn word_match_fraction(a: &str, b: &str, mode: WordMatchMode) -> Option<f64> {
    fraction(&Words::new(a), &Words::new(b), mode)
}

fn fraction(a: &Words<'_>, b: &Words<'_>, mode: WordMatchMode) -> Option<f64> {
    let denominator = match mode {
        WordMatchMode::Ordering => a.set.len().max(b.set.len()),
        WordMatchMode::Subset => a.set.len().min(b.set.len()),
    };
    if denominator == 0 {
        return None;
    }
    let shared = a.set.intersection(&b.set).count();
    Some(shared as f64 / denominator as f64)
}

/// Returns `true` if `a` and `b` match at `threshold` (inclusive).
///
/// Values with the same words in the same order never match here; they differ
/// only in spacing and are folded by the space-removal rule instead.
pub fn words_match(a: &str, b: &str, mode: WordMatchMode, threshold: f64) -> bool {
    pair_matches(&Words::new(a), &Words::new(b), mode, threshold)
}

fn pair_matches(a: &Words<'_>, b: &Words<'_>, mode: WordMatchMode, threshold: f64) -> bool {
    if a.sequence == b.sequence {
        return false;
    }
    fraction(a, b, mode).is_some_and(|f| f >= threshold)
}

impl EntrySet {
    /// Computes the word-match relation between every pair of entries.
    ///
    /// The absence entry matches nothing and the diagonal is unmarked.
    pub fn word_match_matrix(&self, mode: WordMatchMode, threshold: f64) -> ClosenessMatrix {
        let words: Vec<Option<Words<'_>>> = self
            .entries()
            .iter()
            .map(|e| e.value.as_deref().map(Words::new))
            .collect();

        let mut matrix = ClosenessMatrix::new(words.len(), mode.reason());
        for (i, a) in words.iter().enumerate() {
            let Some(a) = a else { continue };
            for (j, b) in words.iter().enumerate().skip(i + 1) {
                let Some(b) = b else { continue };
                if pair_matches(a, b, mode, threshold) {
                    matrix.set(i, j, true);
                }
            }
        }
        matrix
    }

    /// Merges entries whose word sets match at `fraction_threshold`.
    ///
    /// Matches chain: if `A` matches `B` and `B` matches `C`, all three merge
    /// even if `A` and `C` share nothing. One report per merged group is
    /// logged with the reason of `mode`. Returns the merged values.
    ///
    /// # Errors
    ///
    /// Propagates [`MatrixError`] from the merge step. The matrix is built
    /// from this set, so this only fails on an internal inconsistency.
    pub fn merge_ignoring_word_order(
        &mut self,
        fraction_threshold: f64,
        mode: WordMatchMode,
    ) -> Result<Vec<String>, MatrixError> {
        let matrix = self.word_match_matrix(mode, fraction_threshold);
        tracing::trace!(
            field = %self.field(),
            mode = mode.reason(),
            pairs = matrix.pair_count(),
            "word-set matches"
        );
        self.merge_by_specified_matrices(&[matrix])
    }
}
