//! Typed analysis configuration.
//!
//! Every option the engine reads lives here, grouped by stage. All sections
//! deserialize with `#[serde(default)]`, so a TOML file only needs to name the
//! values it changes. [`AnalysisConfig::validate`] rejects values the engine
//! cannot use; nothing is clamped.
use serde::{Deserialize, Serialize};

use crate::edit_distance::EditDistanceMetric;
use crate::normalize::Rule;
use crate::pattern::{Pattern, PatternError};
use crate::record::Field;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// A configuration the engine refuses to run with.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML text could not be parsed into an [`AnalysisConfig`].
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A word-match fraction is outside `[0, 1]` or not a number.
    #[error("{name} must be between 0 and 1, got {value}")]
    FractionOutOfRange {
        /// Option name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A custom replacement rule has an invalid regular expression.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// A custom replacement rule has an empty pattern.
    #[error("custom rule {position} has an empty pattern")]
    EmptyPattern {
        /// Zero-based position of the rule in `normalization.custom`.
        position: usize,
    },
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Which fields are analysed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldSelection {
    /// Analyse titles. Required for duplicate detection.
    pub titles: bool,
    /// Analyse artists.
    pub artists: bool,
    /// Analyse composers.
    pub composers: bool,
    /// Analyse albums.
    pub albums: bool,
    /// Analyse genres.
    pub genres: bool,
}

impl Default for FieldSelection {
    fn default() -> Self {
        Self {
            titles: true,
            artists: true,
            composers: true,
            albums: true,
            genres: true,
        }
    }
}

impl FieldSelection {
    /// Selected fields in processing order.
    pub fn selected(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.contains(*f))
            .collect()
    }

    /// Returns `true` if `field` is selected.
    pub fn contains(&self, field: Field) -> bool {
        match field {
            Field::Title => self.titles,
            Field::Artist => self.artists,
            Field::Composer => self.composers,
            Field::Album => self.albums,
            Field::Genres => self.genres,
        }
    }
}

/// A user-supplied rewrite applied after the built-in rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomRule {
    /// Text or regular expression to search for.
    pub pattern: String,
    /// Replacement text. Regex rules may use `$1`-style group references.
    #[serde(default)]
    pub replacement: String,
    /// Treat `pattern` as a regular expression.
    #[serde(default)]
    pub regex: bool,
}

impl CustomRule {
    /// Compiles this rule.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `regex` is set and the pattern does not
    /// compile.
    pub fn compile(&self, ignore_case: bool) -> Result<Rule, PatternError> {
        let rule = if self.regex {
            Rule::Replace {
                pattern: Pattern::regex(&self.pattern)?,
                replacement: self.replacement.clone(),
            }
        } else {
            Rule::literal(&self.pattern, &self.replacement, ignore_case)
        };
        Ok(rule)
    }
}

/// Toggles for the lexical normalization rules, in application order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizationConfig {
    /// Run the normalization pipeline at all.
    pub enabled: bool,
    /// Strip leading track numbers and spaces from titles.
    pub remove_leading_title_numbers: bool,
    /// `in'` becomes `ing`.
    pub expand_contractions: bool,
    /// `Mister`, `Doctor` and `Professor` become `Mr.`, `Dr.` and `Prof.`.
    pub abbreviate_honorifics: bool,
    /// Remove `.`.
    pub remove_periods: bool,
    /// Remove `,`.
    pub remove_commas: bool,
    /// Remove `-`.
    pub remove_hyphens: bool,
    /// Remove `:`.
    pub remove_colons: bool,
    /// Remove `;`.
    pub remove_semicolons: bool,
    /// Remove `"`.
    pub remove_quotation_marks: bool,
    /// Remove `'`.
    pub remove_single_quotes: bool,
    /// Remove round, square and curly brackets.
    pub remove_brackets: bool,
    /// ` and ` becomes ` & `.
    pub convert_ands_to_ampersands: bool,
    /// Remove `the `.
    pub remove_thes: bool,
    /// Remove spaces. Runs after word matching when that is enabled.
    pub remove_spaces: bool,
    /// Extra rewrites applied after the built-in ones.
    pub custom: Vec<CustomRule>,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            remove_leading_title_numbers: true,
            expand_contractions: true,
            abbreviate_honorifics: true,
            remove_periods: true,
            remove_commas: true,
            remove_hyphens: true,
            remove_colons: true,
            remove_semicolons: true,
            remove_quotation_marks: true,
            remove_single_quotes: true,
            remove_brackets: true,
            convert_ands_to_ampersands: true,
            remove_thes: true,
            remove_spaces: true,
            custom: Vec::new(),
        }
    }
}

/// Word-set matching options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WordSetConfig {
    /// Merge values with the same words in a different order.
    pub check_word_ordering: bool,
    /// Minimum shared-word fraction over the larger word count.
    pub word_ordering_fraction_match: f64,
    /// Merge values whose words are mostly contained in another value.
    pub check_word_subset: bool,
    /// Minimum shared-word fraction over the smaller word count.
    pub word_subset_fraction_match: f64,
}

impl Default for WordSetConfig {
    fn default() -> Self {
        Self {
            check_word_ordering: true,
            word_ordering_fraction_match: 0.70,
            check_word_subset: true,
            word_subset_fraction_match: 0.80,
        }
    }
}

impl WordSetConfig {
    /// Returns `true` if any word matcher runs.
    pub fn any_enabled(&self) -> bool {
        self.check_word_ordering || self.check_word_subset
    }
}

/// Edit-distance metric toggles and thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditDistanceConfig {
    /// Use the absolute metric.
    pub check_absolute: bool,
    /// Maximum number of edits.
    pub absolute_threshold: u32,
    /// Use the proportional metric.
    pub check_proportional: bool,
    /// Maximum edits as a percentage of the longer value.
    pub proportional_threshold: u32,
    /// Use the subset metric.
    pub check_subset: bool,
    /// Maximum edits beyond the length difference, as a percentage of the
    /// shorter value.
    pub subset_threshold: u32,
}

impl Default for EditDistanceConfig {
    fn default() -> Self {
        Self {
            check_absolute: true,
            absolute_threshold: 1,
            check_proportional: true,
            proportional_threshold: 20,
            check_subset: false,
            subset_threshold: 20,
        }
    }
}

impl EditDistanceConfig {
    /// Enabled metrics with their thresholds, in reporting order.
    pub fn enabled_metrics(&self) -> Vec<(EditDistanceMetric, u32)> {
        [
            (self.check_absolute, EditDistanceMetric::Absolute, self.absolute_threshold),
            (
                self.check_proportional,
                EditDistanceMetric::Proportional,
                self.proportional_threshold,
            ),
            (self.check_subset, EditDistanceMetric::Subset, self.subset_threshold),
        ]
        .into_iter()
        .filter(|(on, _, _)| *on)
        .map(|(_, metric, threshold)| (metric, threshold))
        .collect()
    }
}

/// Duplicate-recording detection options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DuplicateConfig {
    /// Run duplicate detection over the title clusters.
    pub enabled: bool,
    /// Require durations within `duration_tolerance_percent` of each other.
    pub check_duration: bool,
    /// Allowed duration difference, as a percentage of the longer duration.
    pub duration_tolerance_percent: u32,
    /// Require identical artists.
    pub check_artist: bool,
    /// Require identical composers.
    pub check_composer: bool,
    /// Require at least one shared genre.
    pub check_genre: bool,
    /// Reject pairs whose albums are identical.
    pub check_album: bool,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            check_duration: true,
            duration_tolerance_percent: 5,
            check_artist: true,
            check_composer: false,
            check_genre: false,
            check_album: false,
        }
    }
}

// ---------------------------------------------------------------------------
// AnalysisConfig
// ---------------------------------------------------------------------------

/// Complete configuration for [`crate::analyze`].
///
/// Construct with [`Default`] and adjust fields, or load from TOML with
/// [`AnalysisConfig::from_toml_str`]. Either way, call
/// [`AnalysisConfig::validate`] (which `analyze` does) before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Case-fold values before comparing them.
    pub ignore_case: bool,
    /// Which fields are analysed.
    pub fields: FieldSelection,
    /// Lexical normalization rules.
    pub normalization: NormalizationConfig,
    /// Word-set matching.
    pub word_sets: WordSetConfig,
    /// Edit-distance matching.
    pub edit_distance: EditDistanceConfig,
    /// Duplicate-recording detection.
    pub duplicates: DuplicateConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ignore_case: true,
            fields: FieldSelection::default(),
            normalization: NormalizationConfig::default(),
            word_sets: WordSetConfig::default(),
            edit_distance: EditDistanceConfig::default(),
            duplicates: DuplicateConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML, unknown keys or
    /// negative thresholds, and any error [`AnalysisConfig::validate`]
    /// reports.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Renders this configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; this does not happen for configurations
    /// built from this crate's types.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Checks every value the engine depends on.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::FractionOutOfRange`] if a word-match fraction is not
    ///   within `[0, 1]`.
    /// - [`ConfigError::EmptyPattern`] if a custom rule has no pattern.
    /// - [`ConfigError::Pattern`] if a custom regex does not compile.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_fraction(
            "word_ordering_fraction_match",
            self.word_sets.word_ordering_fraction_match,
        )?;
        check_fraction(
            "word_subset_fraction_match",
            self.word_sets.word_subset_fraction_match,
        )?;
        self.custom_rules()?;
        Ok(())
    }

    /// Compiles the custom normalization rules.
    ///
    /// # Errors
    ///
    /// Same as the pattern checks of [`AnalysisConfig::validate`].
    pub fn custom_rules(&self) -> Result<Vec<Rule>, ConfigError> {
        self.normalization
            .custom
            .iter()
            .enumerate()
            .map(|(position, rule)| {
                if rule.pattern.is_empty() {
                    return Err(ConfigError::EmptyPattern { position });
                }
                Ok(rule.compile(self.ignore_case)?)
            })
            .collect()
    }
}

fn check_fraction(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::FractionOutOfRange { name, value })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]
    #![allow(clippy::wildcard_enum_match_arm)]

    use super::*;

    #[test]
    fn default_config_is_valid() {
        AnalysisConfig::default()
            .validate()
            .expect("defaults must validate");
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = AnalysisConfig::from_toml_str("").expect("empty document");
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_named_values() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            ignore_case = false

            [word_sets]
            word_subset_fraction_match = 0.5

            [edit_distance]
            check_subset = true
            "#,
        )
        .expect("valid document");
        assert!(!config.ignore_case);
        assert!((config.word_sets.word_subset_fraction_match - 0.5).abs() < f64::EPSILON);
        assert!(config.word_sets.check_word_ordering, "untouched default");
        assert!(config.edit_distance.check_subset);
        assert_eq!(config.edit_distance.subset_threshold, 20);
    }

    #[test]
    fn fraction_above_one_is_rejected() {
        let mut config = AnalysisConfig::default();
        config.word_sets.word_ordering_fraction_match = 1.5;
        match config.validate() {
            Err(ConfigError::FractionOutOfRange { name, .. }) => {
                assert_eq!(name, "word_ordering_fraction_match");
            }
            other => panic!("expected FractionOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn negative_and_nan_fractions_are_rejected() {
        let mut config = AnalysisConfig::default();
        config.word_sets.word_subset_fraction_match = -0.1;
        assert!(config.validate().is_err());
        config.word_sets.word_subset_fraction_match = f64::NAN;
        assert!(config.validate().is_err(), "NaN must not pass");
    }

    #[test]
    fn fraction_bounds_are_accepted() {
        let mut config = AnalysisConfig::default();
        config.word_sets.word_ordering_fraction_match = 0.0;
        config.word_sets.word_subset_fraction_match = 1.0;
        config.validate().expect("0 and 1 are valid");
    }

    #[test]
    fn negative_threshold_fails_to_parse() {
        let err = AnalysisConfig::from_toml_str("[edit_distance]\nabsolute_threshold = -1\n")
            .expect_err("negative threshold");
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn unknown_key_fails_to_parse() {
        let err = AnalysisConfig::from_toml_str("ignore_cases = true\n").expect_err("typo");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_custom_regex_is_rejected() {
        let err = AnalysisConfig::from_toml_str(
            r#"
            [[normalization.custom]]
            pattern = "(feat"
            regex = true
            "#,
        )
        .expect_err("bad regex");
        assert!(matches!(err, ConfigError::Pattern(_)), "got {err:?}");
    }

    #[test]
    fn empty_custom_pattern_is_rejected() {
        let mut config = AnalysisConfig::default();
        config.normalization.custom.push(CustomRule {
            pattern: String::new(),
            replacement: "x".to_owned(),
            regex: false,
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyPattern { position: 0 })
        ));
    }

    #[test]
    fn enabled_metrics_follow_toggles() {
        let config = EditDistanceConfig::default();
        assert_eq!(
            config.enabled_metrics(),
            vec![
                (EditDistanceMetric::Absolute, 1),
                (EditDistanceMetric::Proportional, 20)
            ]
        );
    }

    #[test]
    fn field_selection_lists_fields_in_order() {
        let selection = FieldSelection {
            composers: false,
            ..FieldSelection::default()
        };
        assert_eq!(
            selection.selected(),
            vec![Field::Title, Field::Artist, Field::Album, Field::Genres]
        );
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = AnalysisConfig::default();
        config.normalization.custom.push(CustomRule {
            pattern: r"\s+\(Remastered\)$".to_owned(),
            replacement: String::new(),
            regex: true,
        });
        let text = config.to_toml_string().expect("serialize");
        let back = AnalysisConfig::from_toml_str(&text).expect("parse back");
        assert_eq!(back, config);
    }
}
