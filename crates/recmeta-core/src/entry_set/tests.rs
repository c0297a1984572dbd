#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use super::*;

fn titles(values: &[Option<&str>]) -> EntrySet {
    EntrySet::from_values(Field::Title, values.iter().copied())
}

fn values_of(set: &EntrySet) -> Vec<Option<String>> {
    set.entries().iter().map(|e| e.value.clone()).collect()
}

// -- build ------------------------------------------------------------------

#[test]
fn build_groups_identical_raw_values_without_reports() {
    let set = titles(&[Some("Blue"), Some("Green"), Some("Blue")]);
    assert_eq!(set.len(), 2);
    assert_eq!(set.entries()[0].record_indices, vec![0, 2]);
    assert!(set.reports().is_empty(), "build must not log provenance");
}

#[test]
fn build_puts_absent_records_in_one_trailing_entry() {
    let set = titles(&[None, Some("Blue"), None]);
    assert_eq!(set.len(), 2);
    let last = set.entries().last().expect("absence entry");
    assert!(last.is_absent());
    assert_eq!(set.indexes_of_absence_entries(), Some(&[0usize, 2][..]));
}

#[test]
fn build_from_empty_records_is_empty() {
    let set = EntrySet::build(&[], Field::Artist);
    assert!(set.is_empty());
    assert!(set.indexes_of_absence_entries().is_none());
}

#[test]
fn build_genres_covers_every_genre_occurrence() {
    let records = vec![
        Recording {
            genres: Some(vec!["Jazz".to_owned(), "Blues".to_owned()]),
            ..Recording::default()
        },
        Recording {
            genres: Some(vec!["Blues".to_owned(), "Blues".to_owned()]),
            ..Recording::default()
        },
        Recording::default(),
    ];
    let set = EntrySet::build(&records, Field::Genres);
    assert_eq!(
        values_of(&set),
        vec![Some("Jazz".to_owned()), Some("Blues".to_owned()), None]
    );
    assert_eq!(set.entries()[1].record_indices, vec![0, 1], "repeated genre counted once");
    assert_eq!(set.indexes_of_absence_entries(), Some(&[2usize][..]));
}

// -- sort -------------------------------------------------------------------

#[test]
fn sort_orders_values_with_absence_last() {
    let mut set = titles(&[None, Some("b"), Some("B"), Some("a")]);
    set.sort();
    assert_eq!(
        values_of(&set),
        vec![
            Some("B".to_owned()),
            Some("a".to_owned()),
            Some("b".to_owned()),
            None
        ]
    );
}

#[test]
fn sort_is_idempotent_and_keeps_indices() {
    let mut set = titles(&[Some("z"), Some("y"), Some("z")]);
    set.sort();
    let once = set.clone();
    set.sort();
    assert_eq!(set, once);
    assert_eq!(set.entries()[1].record_indices, vec![0, 2]);
}

// -- merge_identical --------------------------------------------------------

#[test]
fn lower_case_then_merge_identical_folds_case_variants() {
    let mut set = EntrySet::from_values(
        Field::Genres,
        [Some("Jazz"), Some("jazz"), Some("JAZZ"), Some("Rock")],
    );
    set.to_lower_case();
    let merged = set.merge_identical(true, "Letter capitalization");
    assert_eq!(merged, vec!["jazz".to_owned()]);
    assert_eq!(set.len(), 2);
    assert_eq!(set.entries()[0].value.as_deref(), Some("jazz"));
    assert_eq!(set.entries()[0].record_indices, vec![0, 1, 2]);
    assert_eq!(set.entries()[1].value.as_deref(), Some("rock"));
    assert_eq!(set.entries()[1].len(), 1);
    assert_eq!(set.reports().len(), 1);
    assert_eq!(set.reports()[0].indices, vec![0, 1, 2]);
}

#[test]
fn merge_identical_twice_is_a_no_op() {
    let mut set = titles(&[Some("a"), Some("A"), Some("b")]);
    set.to_lower_case();
    set.merge_identical(true, "Letter capitalization");
    let after_first = set.clone();
    let merged = set.merge_identical(true, "Letter capitalization");
    assert!(merged.is_empty());
    assert_eq!(set, after_first, "second pass must not change anything");
}

#[test]
fn merge_identical_without_provenance_logs_nothing() {
    let mut set = titles(&[Some("a"), Some("A")]);
    set.to_lower_case();
    let merged = set.merge_identical(false, "ignored");
    assert_eq!(merged.len(), 1);
    assert!(set.reports().is_empty());
}

#[test]
fn merge_identical_never_touches_absence() {
    let mut set = titles(&[None, Some("x"), None]);
    assert!(set.merge_identical(true, "r").is_empty());
    assert_eq!(set.len(), 2);
}

#[test]
fn merge_identical_on_empty_set_is_a_no_op() {
    let mut set = EntrySet::build(&[], Field::Title);
    assert!(set.merge_identical(true, "r").is_empty());
}

#[test]
fn merged_genre_entry_holds_each_record_once() {
    let records = vec![Recording {
        genres: Some(vec!["Jazz".to_owned(), "jazz".to_owned()]),
        ..Recording::default()
    }];
    let mut set = EntrySet::build(&records, Field::Genres);
    set.to_lower_case();
    set.merge_identical(true, "Letter capitalization");
    assert_eq!(set.entries()[0].record_indices, vec![0]);
}

// -- find_and_replace -------------------------------------------------------

#[test]
fn find_and_replace_reports_changes_without_merging() {
    let mut set = titles(&[Some("Rock and Roll"), Some("Rock & Roll")]);
    let changes = set.find_and_replace(&Pattern::literal(" and "), " & ");
    assert_eq!(
        changes,
        vec![("Rock and Roll".to_owned(), "Rock & Roll".to_owned())]
    );
    assert_eq!(set.len(), 2, "find_and_replace must not merge");
    assert_eq!(set.merge_identical(true, "and").len(), 1);
    assert_eq!(set.len(), 1);
}

#[test]
fn find_and_replace_skips_results_that_would_be_empty() {
    let mut set = titles(&[Some("..."), Some("A.B")]);
    let changes = set.find_and_replace(&Pattern::literal("."), "");
    assert_eq!(changes, vec![("A.B".to_owned(), "AB".to_owned())]);
    assert_eq!(set.entries()[0].value.as_deref(), Some("..."));
}

#[test]
fn find_and_replace_with_regex() {
    let mut set = titles(&[Some("Song (Live)"), None]);
    let pattern = Pattern::regex(r"\s*\(Live\)$").expect("valid regex");
    let changes = set.find_and_replace(&pattern, "");
    assert_eq!(changes.len(), 1);
    assert_eq!(set.entries()[0].value.as_deref(), Some("Song"));
    assert!(set.entries()[1].is_absent(), "absence entry untouched");
}

// -- remove_leading_digits_and_spaces ---------------------------------------

#[test]
fn leading_track_numbers_are_stripped() {
    let mut set = titles(&[Some("01 Intro"), Some(" 2  Outro"), Some("Intro")]);
    let changes = set.remove_leading_digits_and_spaces();
    assert_eq!(changes.len(), 2);
    assert_eq!(set.entries()[0].value.as_deref(), Some("Intro"));
    assert_eq!(set.entries()[1].value.as_deref(), Some("Outro"));
}

#[test]
fn all_digit_values_are_left_alone() {
    let mut set = titles(&[Some("1999"), Some("12 ")]);
    assert!(set.remove_leading_digits_and_spaces().is_empty());
    assert_eq!(set.entries()[0].value.as_deref(), Some("1999"));
}

// -- queries ----------------------------------------------------------------

#[test]
fn multiple_entries_lists_shared_values() {
    let set = titles(&[Some("a"), Some("b"), Some("a")]);
    let multi = set.multiple_entries();
    assert_eq!(multi.len(), 1);
    assert_eq!(multi[0].value.as_deref(), Some("a"));
}

#[test]
fn values_requiring_space_strip_is_a_pure_query() {
    let set = titles(&[Some(" lead"), Some("trail "), Some("clean")]);
    let before = set.clone();
    assert_eq!(set.values_requiring_space_strip(), vec![" lead", "trail "]);
    assert_eq!(set, before);
}

#[test]
fn entry_for_record_finds_holder() {
    let set = titles(&[Some("a"), Some("b")]);
    let entry = set.entry_for_record(1).expect("record 1 is held");
    assert_eq!(entry.value.as_deref(), Some("b"));
    assert!(set.entry_for_record(7).is_none());
}

#[test]
fn check_partition_detects_gaps_and_overlaps() {
    let set = titles(&[Some("a"), Some("b")]);
    assert_eq!(set.check_partition(2), Ok(()));
    assert_eq!(
        set.check_partition(3),
        Err(PartitionViolation::Missing { index: 2 })
    );
    assert_eq!(
        set.check_partition(1),
        Err(PartitionViolation::OutOfRange { index: 1 })
    );
}

// -- merge_positions --------------------------------------------------------

#[test]
fn merge_positions_takes_longest_value_and_first_position() {
    let mut set = titles(&[Some("Beethoven"), Some("Bach"), Some("L. v. Beethoven")]);
    let merged = set.merge_positions(&[vec![0, 2]]);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].value, "L. v. Beethoven");
    assert_eq!(
        values_of(&set),
        vec![Some("L. v. Beethoven".to_owned()), Some("Bach".to_owned())]
    );
    assert_eq!(set.entries()[0].record_indices, vec![0, 2]);
    assert_eq!(set.check_partition(3), Ok(()));
}

// -- raw value tracking -----------------------------------------------------

#[test]
fn merges_keep_every_raw_value_once() {
    let mut set = titles(&[Some("So What"), Some("so what"), Some("SO WHAT"), Some("So What")]);
    set.to_lower_case();
    set.merge_identical(true, "Letter capitalization");

    assert_eq!(set.len(), 1);
    assert_eq!(
        set.entries()[0].original_values,
        vec!["So What", "so what", "SO WHAT"]
    );
    assert_eq!(set.entries()[0].record_indices, vec![0, 3, 1, 2]);
}

#[test]
fn rewriting_values_leaves_raw_values_alone() {
    let mut set = titles(&[Some("01 Blue"), None]);
    set.remove_leading_digits_and_spaces();
    assert_eq!(set.entries()[0].value.as_deref(), Some("Blue"));
    assert_eq!(set.entries()[0].original_values, vec!["01 Blue"]);
    assert!(set.entries()[1].original_values.is_empty(), "absence has none");
}
