//! Text damage applied to copies of a work.

use rand::Rng;
use rand::rngs::StdRng;

/// Kinds of damage [`damage`] can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Damage {
    /// Lower or upper case the whole value.
    Case,
    /// Insert a stray period, comma or quote.
    Punctuation,
    /// Swap two adjacent words.
    WordSwap,
    /// Replace, drop or double one letter.
    Typo,
    /// Drop the last word.
    Truncation,
    /// Prefix a track number such as `"03 "`.
    TrackNumber,
}

const ALL: [Damage; 6] = [
    Damage::Case,
    Damage::Punctuation,
    Damage::WordSwap,
    Damage::Typo,
    Damage::Truncation,
    Damage::TrackNumber,
];

/// Applies one randomly chosen kind of damage to `value`.
pub fn damage(value: &str, rng: &mut StdRng) -> String {
    let kind = ALL[rng.gen_range(0..ALL.len())];
    apply(kind, value, rng)
}

/// Applies `kind` to `value`.
///
/// Damage that cannot apply (swapping words in a one-word value, say)
/// returns the value unchanged.
pub fn apply(kind: Damage, value: &str, rng: &mut StdRng) -> String {
    match kind {
        Damage::Case => {
            if rng.gen_bool(0.5) {
                value.to_lowercase()
            } else {
                value.to_uppercase()
            }
        }
        Damage::Punctuation => {
            let marks = ['.', ',', '\''];
            let mark = marks[rng.gen_range(0..marks.len())];
            let mut chars: Vec<char> = value.chars().collect();
            let at = rng.gen_range(0..=chars.len());
            chars.insert(at, mark);
            chars.into_iter().collect()
        }
        Damage::WordSwap => {
            let mut words: Vec<&str> = value.split_whitespace().collect();
            if words.len() < 2 {
                return value.to_owned();
            }
            let at = rng.gen_range(0..words.len() - 1);
            words.swap(at, at + 1);
            words.join(" ")
        }
        Damage::Typo => typo(value, rng),
        Damage::Truncation => {
            let words: Vec<&str> = value.split_whitespace().collect();
            if words.len() < 2 {
                return value.to_owned();
            }
            words[..words.len() - 1].join(" ")
        }
        Damage::TrackNumber => format!("{:02} {value}", rng.gen_range(1..=20)),
    }
}

fn typo(value: &str, rng: &mut StdRng) -> String {
    let mut chars: Vec<char> = value.chars().collect();
    let letters: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_alphabetic())
        .map(|(i, _)| i)
        .collect();
    if letters.is_empty() {
        return value.to_owned();
    }
    let at = letters[rng.gen_range(0..letters.len())];
    match rng.gen_range(0..3) {
        0 => chars[at] = char::from(rng.gen_range(b'a'..=b'z')),
        1 => {
            chars.remove(at);
        }
        _ => {
            let doubled = chars[at];
            chars.insert(at, doubled);
        }
    }
    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use rand::SeedableRng;

    use super::*;

    #[test]
    fn word_swap_keeps_the_words() {
        let mut rng = StdRng::seed_from_u64(7);
        let out = apply(Damage::WordSwap, "Autumn Leaves", &mut rng);
        assert_eq!(out, "Leaves Autumn");
    }

    #[test]
    fn single_word_values_survive_word_damage() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(apply(Damage::WordSwap, "Blue", &mut rng), "Blue");
        assert_eq!(apply(Damage::Truncation, "Blue", &mut rng), "Blue");
    }

    #[test]
    fn track_number_is_two_digits() {
        let mut rng = StdRng::seed_from_u64(1);
        let out = apply(Damage::TrackNumber, "So What", &mut rng);
        let (number, rest) = out.split_once(' ').expect("space after number");
        assert_eq!(number.len(), 2);
        assert!(number.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(rest, "So What");
    }

    #[test]
    fn typo_changes_length_by_at_most_one() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let out = apply(Damage::Typo, "Antonín Dvořák", &mut rng);
            let diff = out.chars().count().abs_diff("Antonín Dvořák".chars().count());
            assert!(diff <= 1, "{out}");
        }
    }

    #[test]
    fn punctuation_adds_one_char() {
        let mut rng = StdRng::seed_from_u64(5);
        let out = apply(Damage::Punctuation, "Time Out", &mut rng);
        assert_eq!(out.chars().count(), "Time Out".chars().count() + 1);
    }
}
