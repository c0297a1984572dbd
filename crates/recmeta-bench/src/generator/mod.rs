//! Noisy music library generator.
//!
//! Produces a set of distinct "works" and then one or more copies of each,
//! every copy a [`Recording`] whose text fields may carry the kinds of
//! damage found in real libraries: case changes, stray punctuation, swapped
//! words, typos, truncations and track-number prefixes.

pub mod catalog;
pub mod noise;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use recmeta_core::Recording;

use catalog::Work;
use noise::damage;

/// Configuration for the library generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Seed for the random number generator (deterministic).
    pub seed: u64,
    /// Number of distinct works.
    pub num_works: usize,
    /// Maximum copies per work (at least 1).
    pub max_copies: usize,
    /// Probability that a copy's text field is damaged (0.0-1.0).
    pub noise_rate: f64,
    /// Probability that an optional field is left out (0.0-1.0).
    pub missing_rate: f64,
    /// Maximum duration jitter between copies, in percent.
    pub duration_jitter_percent: u64,
}

/// Predefined size tiers for benchmarking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    /// ~60 records
    Small,
    /// ~400 records
    Medium,
    /// ~1600 records
    Large,
}

impl SizeTier {
    /// Returns the default `GeneratorConfig` for this size tier.
    pub fn config(self, seed: u64) -> GeneratorConfig {
        match self {
            SizeTier::Small => GeneratorConfig {
                seed,
                num_works: 30,
                max_copies: 3,
                noise_rate: 0.3,
                missing_rate: 0.1,
                duration_jitter_percent: 3,
            },
            SizeTier::Medium => GeneratorConfig {
                seed,
                num_works: 200,
                max_copies: 3,
                noise_rate: 0.25,
                missing_rate: 0.15,
                duration_jitter_percent: 4,
            },
            SizeTier::Large => GeneratorConfig {
                seed,
                num_works: 800,
                max_copies: 3,
                noise_rate: 0.2,
                missing_rate: 0.15,
                duration_jitter_percent: 4,
            },
        }
    }
}

/// Generated records plus the work each record was copied from.
#[derive(Debug, Clone)]
pub struct GeneratedLibrary {
    /// The records, copies of one work not necessarily adjacent.
    pub records: Vec<Recording>,
    /// `work_of[i]` is the work index of `records[i]`.
    pub work_of: Vec<usize>,
}

impl GeneratedLibrary {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no records were generated.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Generates a library from the given configuration.
///
/// All randomness is deterministic, seeded from `config.seed`.
pub fn generate_library(config: &GeneratorConfig) -> GeneratedLibrary {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let works: Vec<Work> = (0..config.num_works)
        .map(|i| catalog::work(i, &mut rng))
        .collect();

    let mut copies: Vec<(usize, Recording)> = Vec::new();
    for (index, work) in works.iter().enumerate() {
        let count = rng.gen_range(1..=config.max_copies.max(1));
        for _ in 0..count {
            copies.push((index, copy_of(work, config, &mut rng)));
        }
    }

    // Interleave copies so duplicates are not always adjacent.
    for i in (1..copies.len()).rev() {
        let j = rng.gen_range(0..=i);
        copies.swap(i, j);
    }

    let (work_of, records): (Vec<usize>, Vec<Recording>) = copies.into_iter().unzip();
    GeneratedLibrary { records, work_of }
}

fn copy_of(work: &Work, config: &GeneratorConfig, rng: &mut StdRng) -> Recording {
    let text = |value: &str, rng: &mut StdRng| {
        if rng.gen_bool(config.noise_rate) {
            damage(value, rng)
        } else {
            value.to_owned()
        }
    };
    let title = text(&work.title, rng);
    let artist = text(&work.artist, rng);
    let composer = work.composer.as_deref().map(|c| text(c, rng));
    let album = if rng.gen_bool(config.missing_rate) {
        None
    } else {
        Some(work.album.clone())
    };
    let genres = if rng.gen_bool(config.missing_rate) {
        None
    } else {
        Some(work.genres.clone())
    };
    let duration = if rng.gen_bool(config.missing_rate) {
        None
    } else {
        let jitter = work.duration * config.duration_jitter_percent / 100;
        Some(work.duration - jitter + rng.gen_range(0..=jitter * 2))
    };

    Recording {
        title: Some(title),
        artist: Some(artist),
        composer,
        album,
        genres,
        duration,
    }
}
