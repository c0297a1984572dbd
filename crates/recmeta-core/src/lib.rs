#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod analysis;
pub mod closeness;
pub mod config;
pub mod duplicates;
pub mod edit_distance;
pub mod entry_set;
pub mod merge_report;
pub mod normalize;
pub mod pattern;
pub mod record;
pub mod union_find;
pub mod word_set;

pub use analysis::{
    AnalysisError, AnalysisOutput, CASE_FOLD_REASON, FieldAnalysis, ProbableErrorCluster, analyze,
    analyze_field, probable_errors,
};
pub use closeness::{ClosenessMatrix, MatrixError};
pub use config::{
    AnalysisConfig, ConfigError, CustomRule, DuplicateConfig, EditDistanceConfig, FieldSelection,
    NormalizationConfig, WordSetConfig,
};
pub use duplicates::{
    DuplicateGroup, DuplicateResolution, RejectedCluster, are_same_recording, durations_agree,
    resolve_duplicates,
};
pub use edit_distance::{
    DistanceMatrix, EditDistanceMetric, compute_distances, proportional_percentage,
    subset_percentage,
};
pub use entry_set::{Entry, EntrySet, PartitionViolation, ValueChange};
pub use merge_report::{MergeReport, consolidate};
pub use normalize::{LEADING_DIGITS_REASON, NormalizationPipeline, Rule, RuleOutcome};
pub use pattern::{Pattern, PatternError};
pub use record::{Field, Recording};
pub use union_find::UnionFind;
pub use word_set::{WordMatchMode, word_match_fraction, words_match};

/// Returns the current version of the recmeta-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
