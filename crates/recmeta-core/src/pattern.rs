//! Search patterns for [`crate::EntrySet::find_and_replace`].
use std::borrow::Cow;

use regex::Regex;

/// Error raised when a regular-expression pattern fails to compile.
#[derive(Debug, thiserror::Error)]
#[error("invalid pattern {pattern:?}: {source}")]
pub struct PatternError {
    /// The pattern text as supplied.
    pub pattern: String,
    /// The underlying regex compilation error.
    #[source]
    pub source: regex::Error,
}

/// A literal substring or a compiled regular expression.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Plain substring match; every occurrence is replaced.
    Literal(String),
    /// Regular expression; `$n` groups in the replacement are expanded.
    Regex(Regex),
}

impl Pattern {
    /// Creates a literal pattern.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// Compiles a regular-expression pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `expr` is not a valid regular expression.
    pub fn regex(expr: &str) -> Result<Self, PatternError> {
        Regex::new(expr)
            .map(Self::Regex)
            .map_err(|source| PatternError {
                pattern: expr.to_owned(),
                source,
            })
    }

    /// The pattern source text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(text) => text,
            Self::Regex(re) => re.as_str(),
        }
    }

    /// Replaces every match in `value` with `replacement`.
    pub fn replace_all<'a>(&self, value: &'a str, replacement: &str) -> Cow<'a, str> {
        match self {
            Self::Literal(text) if text.is_empty() => Cow::Borrowed(value),
            Self::Literal(text) => {
                if value.contains(text.as_str()) {
                    Cow::Owned(value.replace(text.as_str(), replacement))
                } else {
                    Cow::Borrowed(value)
                }
            }
            Self::Regex(re) => re.replace_all(value, replacement),
        }
    }
}
