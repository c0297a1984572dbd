//! Lexical normalization: ordered rewrite rules with a re-merge after each.
//!
//! A [`NormalizationPipeline`] is a fixed list of [`Rule`]s built from a
//! [`NormalizationConfig`]. Running it on an [`EntrySet`] applies each rule in
//! turn; whenever a rule changes at least one value, entries that became
//! identical are merged and the merge is logged under that rule's reason.
//!
//! Space removal is special: it destroys word boundaries, so when word-set
//! matching is enabled it is split off into a second pipeline that runs after
//! the matchers (see [`NormalizationPipeline::split_space_removal`]).
use serde::Serialize;

use crate::config::NormalizationConfig;
use crate::entry_set::{EntrySet, ValueChange};
use crate::pattern::Pattern;
use crate::record::Field;

/// Reason logged for merges caused by stripping leading track numbers.
pub const LEADING_DIGITS_REASON: &str = "Numbers and spaces removed from beginnings";

/// Upper bound on passes over the rule list in [`NormalizationPipeline::run`].
pub const MAX_PASSES: usize = 8;

/// What one application of a rule did to an entry set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    /// The rule's provenance reason.
    pub reason: String,
    /// Every value the rule rewrote, as `(before, after)`.
    pub changes: Vec<ValueChange>,
    /// Values produced by the merge that followed.
    pub merged: Vec<String>,
}

/// One rewrite step.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Strip leading digits and whitespace.
    StripLeadingDigits,
    /// Replace every match of `pattern` with `replacement`.
    Replace {
        /// What to search for.
        pattern: Pattern,
        /// What to put in its place.
        replacement: String,
    },
}

impl Rule {
    /// A literal replacement. With `ignore_case`, both sides are lower-cased
    /// so they line up with case-folded values.
    pub fn literal(from: &str, to: &str, ignore_case: bool) -> Self {
        let (from, to) = if ignore_case {
            (from.to_lowercase(), to.to_lowercase())
        } else {
            (from.to_owned(), to.to_owned())
        };
        Self::Replace {
            pattern: Pattern::literal(from),
            replacement: to,
        }
    }

    /// Reason string logged when this rule causes a merge.
    pub fn reason(&self) -> String {
        match self {
            Self::StripLeadingDigits => LEADING_DIGITS_REASON.to_owned(),
            Self::Replace {
                pattern,
                replacement,
            } => format!("Replace \"{}\" with \"{replacement}\"", pattern.as_str()),
        }
    }

    /// Applies the rule to every value of `set` without merging.
    pub fn apply(&self, set: &mut EntrySet) -> Vec<ValueChange> {
        match self {
            Self::StripLeadingDigits => set.remove_leading_digits_and_spaces(),
            Self::Replace {
                pattern,
                replacement,
            } => set.find_and_replace(pattern, replacement),
        }
    }

    fn is_space_removal(&self) -> bool {
        match self {
            Self::Replace {
                pattern: Pattern::Literal(text),
                replacement,
            } => text == " " && replacement.is_empty(),
            Self::Replace { .. } | Self::StripLeadingDigits => false,
        }
    }
}

/// An ordered list of rules applied to one field.
#[derive(Debug, Clone, Default)]
pub struct NormalizationPipeline {
    rules: Vec<Rule>,
}

impl NormalizationPipeline {
    /// Creates a pipeline from explicit rules.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Builds the built-in rule list for `field` followed by `custom` rules.
    ///
    /// Leading-number stripping only applies to titles. Space removal, when
    /// enabled, is the last rule.
    pub fn from_config(
        config: &NormalizationConfig,
        field: Field,
        ignore_case: bool,
        custom: &[Rule],
    ) -> Self {
        let mut rules = Vec::new();
        if !config.enabled {
            return Self { rules };
        }
        let literal = |from: &str, to: &str| Rule::literal(from, to, ignore_case);

        if config.remove_leading_title_numbers && field == Field::Title {
            rules.push(Rule::StripLeadingDigits);
        }
        if config.expand_contractions {
            rules.push(literal("in'", "ing"));
        }
        if config.abbreviate_honorifics {
            rules.push(literal("Mister ", "Mr. "));
            rules.push(literal("Doctor ", "Dr. "));
            rules.push(literal("Professor ", "Prof. "));
        }
        let removals = [
            (config.remove_periods, "."),
            (config.remove_commas, ","),
            (config.remove_hyphens, "-"),
            (config.remove_colons, ":"),
            (config.remove_semicolons, ";"),
            (config.remove_quotation_marks, "\""),
            (config.remove_single_quotes, "'"),
        ];
        for (enabled, mark) in removals {
            if enabled {
                rules.push(literal(mark, ""));
            }
        }
        if config.remove_brackets {
            for bracket in ["(", ")", "[", "]", "{", "}"] {
                rules.push(literal(bracket, ""));
            }
        }
        if config.convert_ands_to_ampersands {
            rules.push(literal(" and ", " & "));
        }
        if config.remove_thes {
            rules.push(literal("the ", ""));
        }
        rules.extend(custom.iter().cloned());
        if config.remove_spaces {
            rules.push(literal(" ", ""));
        }
        Self { rules }
    }

    /// Splits space removal off into a pipeline of its own.
    ///
    /// Returns `(self without space removal, space removal only)`.
    pub fn split_space_removal(self) -> (Self, Self) {
        let (spaces, rest): (Vec<Rule>, Vec<Rule>) =
            self.rules.into_iter().partition(Rule::is_space_removal);
        (Self { rules: rest }, Self { rules: spaces })
    }

    /// The rules in application order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns `true` if the pipeline has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Applies every rule to `set`, merging after each rule that changed
    /// something. Returns one outcome per rule application that rewrote at
    /// least one value, in application order.
    ///
    /// A later rule can expose text an earlier rule matches (removing the
    /// period from `in.'` yields `in'`), so the rule list is repeated until a
    /// pass changes nothing, at most [`MAX_PASSES`] times. Running a
    /// converged pipeline again is a no-op.
    pub fn run(&self, set: &mut EntrySet) -> Vec<RuleOutcome> {
        let mut outcomes = Vec::new();
        for pass in 1..=MAX_PASSES {
            let mut changed = false;
            for rule in &self.rules {
                let changes = rule.apply(set);
                if changes.is_empty() {
                    continue;
                }
                changed = true;
                let reason = rule.reason();
                tracing::trace!(
                    field = %set.field(),
                    rule = %reason,
                    changed = changes.len(),
                    pass,
                    "rule applied"
                );
                let merged = set.merge_identical(true, &reason);
                outcomes.push(RuleOutcome {
                    reason,
                    changes,
                    merged,
                });
            }
            if !changed {
                return outcomes;
            }
        }
        tracing::warn!(
            field = %set.field(),
            passes = MAX_PASSES,
            "normalization did not settle; custom rules may undo each other"
        );
        outcomes
    }
}
