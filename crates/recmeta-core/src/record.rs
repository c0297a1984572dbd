//! Input record model and the field selector used to build entry sets.
use serde::{Deserialize, Serialize};

/// One parsed audio recording as handed over by an ingestion layer.
///
/// Records are identified only by their position in the slice passed to the
/// engine. Every field is optional; missing JSON keys deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recording {
    /// Track title.
    pub title: Option<String>,
    /// Performing artist.
    pub artist: Option<String>,
    /// Composer.
    pub composer: Option<String>,
    /// Album name.
    pub album: Option<String>,
    /// Genre names. `None` and an empty list both mean "unknown".
    pub genres: Option<Vec<String>>,
    /// Duration in whole seconds.
    pub duration: Option<u64>,
}

impl Recording {
    /// Creates a recording with only a title set.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Returns the values this recording contributes for `field`.
    ///
    /// Single-valued fields yield exactly one item, `None` when absent.
    /// [`Field::Genres`] yields one item per listed genre, or a single `None`
    /// when the record has no genres.
    pub fn values(&self, field: Field) -> Vec<Option<&str>> {
        match field {
            Field::Title => vec![self.title.as_deref()],
            Field::Artist => vec![self.artist.as_deref()],
            Field::Composer => vec![self.composer.as_deref()],
            Field::Album => vec![self.album.as_deref()],
            Field::Genres => match &self.genres {
                Some(genres) if !genres.is_empty() => {
                    genres.iter().map(|g| Some(g.as_str())).collect()
                }
                Some(_) | None => vec![None],
            },
        }
    }

    /// Returns `true` if this record and `other` list at least one common
    /// genre. An empty genre list counts as no genres, and two records
    /// without genres are considered to agree.
    pub fn shares_genre(&self, other: &Recording) -> bool {
        let mine = self.genres.as_deref().unwrap_or_default();
        let theirs = other.genres.as_deref().unwrap_or_default();
        if mine.is_empty() && theirs.is_empty() {
            return true;
        }
        mine.iter().any(|g| theirs.contains(g))
    }
}

/// Metadata field an [`crate::EntrySet`] is built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Track title.
    Title,
    /// Performing artist.
    Artist,
    /// Composer.
    Composer,
    /// Album name.
    Album,
    /// Genres (multi-valued).
    Genres,
}

impl Field {
    /// All fields in processing order.
    pub const ALL: [Field; 5] = [
        Field::Title,
        Field::Artist,
        Field::Composer,
        Field::Album,
        Field::Genres,
    ];

    /// Returns `true` for fields where a record contributes more than one
    /// value.
    pub fn is_multi_valued(self) -> bool {
        matches!(self, Field::Genres)
    }

    /// Lowercase field name used in reports and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Artist => "artist",
            Field::Composer => "composer",
            Field::Album => "album",
            Field::Genres => "genres",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn missing_json_keys_deserialize_to_none() {
        let rec: Recording =
            serde_json::from_str(r#"{"title":"So What"}"#).expect("valid recording JSON");
        assert_eq!(rec.title.as_deref(), Some("So What"));
        assert!(rec.artist.is_none());
        assert!(rec.genres.is_none());
        assert!(rec.duration.is_none());
    }

    #[test]
    fn genres_yield_one_value_per_genre() {
        let rec = Recording {
            genres: Some(vec!["Jazz".to_owned(), "Bebop".to_owned()]),
            ..Recording::default()
        };
        assert_eq!(rec.values(Field::Genres), vec![Some("Jazz"), Some("Bebop")]);
    }

    #[test]
    fn empty_genre_list_counts_as_absent() {
        let rec = Recording {
            genres: Some(Vec::new()),
            ..Recording::default()
        };
        assert_eq!(rec.values(Field::Genres), vec![None]);
    }

    #[test]
    fn shares_genre_requires_common_value() {
        let a = Recording {
            genres: Some(vec!["Jazz".to_owned(), "Bebop".to_owned()]),
            ..Recording::default()
        };
        let b = Recording {
            genres: Some(vec!["Bebop".to_owned()]),
            ..Recording::default()
        };
        let c = Recording {
            genres: Some(vec!["Rock".to_owned()]),
            ..Recording::default()
        };
        assert!(a.shares_genre(&b));
        assert!(!a.shares_genre(&c));
        assert!(!a.shares_genre(&Recording::default()));
        assert!(Recording::default().shares_genre(&Recording::default()));
    }

    #[test]
    fn empty_genre_list_agrees_only_with_no_genres() {
        let empty = Recording {
            genres: Some(Vec::new()),
            ..Recording::default()
        };
        let jazz = Recording {
            genres: Some(vec!["Jazz".to_owned()]),
            ..Recording::default()
        };
        assert!(empty.shares_genre(&empty));
        assert!(empty.shares_genre(&Recording::default()));
        assert!(Recording::default().shares_genre(&empty));
        assert!(!empty.shares_genre(&jazz));
        assert!(!jazz.shares_genre(&empty));
        assert!(!Recording::default().shares_genre(&jazz));
    }

    #[test]
    fn field_names_round_trip_through_serde() {
        for field in Field::ALL {
            let json = serde_json::to_string(&field).expect("serialize field");
            assert_eq!(json, format!("\"{}\"", field.as_str()));
        }
    }
}
