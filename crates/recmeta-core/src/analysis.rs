//! Full analysis run: every selected field through every enabled stage.
//!
//! Per field, in order:
//!
//! 1. build the entry set from the raw values and sort it;
//! 2. case-fold and merge (`ignore_case`);
//! 3. normalization rules, holding back space removal when word matching runs;
//! 4. word-ordering then word-subset matching;
//! 5. the held-back space removal;
//! 6. edit-distance matching with every enabled metric.
//!
//! The title set then feeds duplicate detection, and each field's provenance
//! log is consolidated into [`ProbableErrorCluster`]s.
use serde::Serialize;

use crate::closeness::MatrixError;
use crate::config::{AnalysisConfig, ConfigError};
use crate::duplicates::{DuplicateResolution, resolve_duplicates};
use crate::entry_set::EntrySet;
use crate::merge_report::consolidate;
use crate::normalize::{NormalizationPipeline, Rule, RuleOutcome};
use crate::record::{Field, Recording};
use crate::word_set::WordMatchMode;

/// Reason logged for merges caused by case folding.
pub const CASE_FOLD_REASON: &str = "Letter capitalization";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from [`analyze`].
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The configuration was rejected before any processing.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A merge step received a matrix that does not fit its entry set.
    #[error("internal error: {0}")]
    Matrix(#[from] MatrixError),
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A group of raw values judged to be spellings of the same thing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbableErrorCluster {
    /// Field the values belong to.
    pub field: Field,
    /// Distinct raw values in the cluster, sorted.
    pub values: Vec<String>,
    /// Why they were merged, oldest reason first.
    pub reasons: Vec<String>,
    /// Records holding one of the values.
    pub record_indices: Vec<usize>,
    /// Number of records holding one of the values.
    pub affected_records: usize,
}

/// Result for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldAnalysis {
    /// The analysed field.
    pub field: Field,
    /// Final clusters, sorted by canonical value.
    pub entries: EntrySet,
    /// Consolidated merge provenance.
    pub probable_errors: Vec<ProbableErrorCluster>,
    /// Raw values with leading or trailing whitespace.
    pub values_requiring_space_strip: Vec<String>,
    /// Value rewrites made by case folding and the normalization rules,
    /// in the order they ran.
    pub rewrites: Vec<RuleOutcome>,
}

/// Result of [`analyze`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisOutput {
    /// Number of input records.
    pub record_count: usize,
    /// One result per selected field, in processing order.
    pub fields: Vec<FieldAnalysis>,
    /// Duplicate detection over titles, when enabled.
    pub duplicates: Option<DuplicateResolution>,
}

impl AnalysisOutput {
    /// The result for `field`, if it was analysed.
    pub fn field(&self, field: Field) -> Option<&FieldAnalysis> {
        self.fields.iter().find(|f| f.field == field)
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Runs the whole analysis over `records`.
///
/// # Errors
///
/// - [`AnalysisError::Config`] if `config` fails validation. Nothing runs.
/// - [`AnalysisError::Matrix`] on an internal inconsistency in a merge step.
pub fn analyze(
    records: &[Recording],
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, AnalysisError> {
    config.validate()?;
    let custom = config.custom_rules()?;

    tracing::info!(
        records = records.len(),
        fields = config.fields.selected().len(),
        "starting analysis"
    );

    let mut fields = Vec::new();
    for field in config.fields.selected() {
        let raw = EntrySet::build(records, field);
        let values_requiring_space_strip = raw
            .values_requiring_space_strip()
            .into_iter()
            .map(str::to_owned)
            .collect();

        let (entries, rewrites) = analyze_field(raw, config, &custom)?;
        let probable_errors = probable_errors(&entries);
        tracing::info!(
            field = %field,
            clusters = entries.len(),
            probable_errors = probable_errors.len(),
            rewrites = rewrites.len(),
            "field analysed"
        );
        fields.push(FieldAnalysis {
            field,
            entries,
            probable_errors,
            values_requiring_space_strip,
            rewrites,
        });
    }

    let duplicates = if config.duplicates.enabled {
        fields
            .iter()
            .find(|f| f.field == Field::Title)
            .map(|titles| resolve_duplicates(records, &titles.entries, &config.duplicates))
    } else {
        None
    };

    Ok(AnalysisOutput {
        record_count: records.len(),
        fields,
        duplicates,
    })
}

/// Runs the per-field stages on a freshly built entry set.
///
/// `custom` are the compiled custom normalization rules of `config`. The
/// returned set is sorted and comes with the rewrites made by case folding
/// and normalization.
///
/// # Errors
///
/// Propagates [`MatrixError`] from the matchers.
pub fn analyze_field(
    mut set: EntrySet,
    config: &AnalysisConfig,
    custom: &[Rule],
) -> Result<(EntrySet, Vec<RuleOutcome>), MatrixError> {
    let field = set.field();
    set.sort();

    let mut rewrites = Vec::new();
    if config.ignore_case {
        let changes = set.to_lower_case();
        let merged = set.merge_identical(true, CASE_FOLD_REASON);
        if !changes.is_empty() {
            rewrites.push(RuleOutcome {
                reason: CASE_FOLD_REASON.to_owned(),
                changes,
                merged,
            });
        }
    }

    let pipeline =
        NormalizationPipeline::from_config(&config.normalization, field, config.ignore_case, custom);
    let (main, deferred) = if config.word_sets.any_enabled() {
        pipeline.split_space_removal()
    } else {
        (pipeline, NormalizationPipeline::default())
    };
    rewrites.extend(main.run(&mut set));

    let words = &config.word_sets;
    if words.check_word_ordering {
        set.merge_ignoring_word_order(words.word_ordering_fraction_match, WordMatchMode::Ordering)?;
    }
    if words.check_word_subset {
        set.merge_ignoring_word_order(words.word_subset_fraction_match, WordMatchMode::Subset)?;
    }
    rewrites.extend(deferred.run(&mut set));

    let metrics = config.edit_distance.enabled_metrics();
    if !metrics.is_empty() {
        tracing::debug!(field = %field, entries = set.len(), "computing edit distances");
        set.merge_by_edit_distance(&metrics)?;
    }

    set.sort();
    Ok((set, rewrites))
}

/// Consolidates the provenance log of `set` into clusters of raw values.
pub fn probable_errors(set: &EntrySet) -> Vec<ProbableErrorCluster> {
    consolidate(set.reports())
        .into_iter()
        .map(|report| ProbableErrorCluster {
            field: set.field(),
            values: report.values,
            reasons: report.reasons,
            affected_records: report.indices.len(),
            record_indices: report.indices,
        })
        .collect()
}
