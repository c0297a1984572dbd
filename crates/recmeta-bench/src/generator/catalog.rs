//! Clean source material: titles, artists, composers, albums and genres.

use rand::Rng;
use rand::rngs::StdRng;

const TITLE_WORDS: &[&str] = &[
    "Blue", "Green", "Midnight", "Autumn", "Summer", "River", "Moon", "Train", "Garden", "Ocean",
    "Silver", "Golden", "Quiet", "Broken", "Electric", "Winter", "Morning", "Little", "Dancing",
    "Lonely",
];

const TITLE_NOUNS: &[&str] = &[
    "Leaves", "Dreams", "Lights", "Streets", "Waltz", "Serenade", "Blues", "Road", "Song", "Heart",
    "Rain", "Sky", "Fields", "Shadows", "Wind",
];

const ARTISTS: &[&str] = &[
    "Miles Davis",
    "John Coltrane",
    "Bill Evans Trio",
    "Ella Fitzgerald",
    "The Beatles",
    "Nina Simone",
    "Dave Brubeck Quartet",
    "Royal Philharmonic Orchestra",
    "Herbie Hancock",
    "Aretha Franklin",
    "Joni Mitchell",
    "The Rolling Stones",
];

const COMPOSERS: &[&str] = &[
    "Ludwig van Beethoven",
    "Antonín Dvořák",
    "Johann Sebastian Bach",
    "Duke Ellington",
    "Thelonious Monk",
    "George Gershwin",
    "Wolfgang Amadeus Mozart",
];

const ALBUMS: &[&str] = &[
    "Kind of Blue",
    "A Love Supreme",
    "Abbey Road",
    "Time Out",
    "Blue",
    "Head Hunters",
    "Lady Soul",
    "Greatest Hits",
    "Live at Montreux",
    "The Complete Sessions",
];

const GENRES: &[&str] = &[
    "Jazz", "Rock", "Classical", "Soul", "Folk", "Pop", "Blues", "Hard Bop", "Fusion",
];

/// One clean recording from which noisy copies are made.
#[derive(Debug, Clone)]
pub struct Work {
    /// Canonical title, unique per work index.
    pub title: String,
    /// Performing artist.
    pub artist: String,
    /// Composer, present for roughly a third of works.
    pub composer: Option<String>,
    /// Album.
    pub album: String,
    /// One or two genres.
    pub genres: Vec<String>,
    /// Duration in seconds.
    pub duration: u64,
}

/// Builds work number `index`.
///
/// Titles cycle through word pairs and gain a part number once the pairs
/// run out, so every index gets a distinct title.
pub fn work(index: usize, rng: &mut StdRng) -> Work {
    let pairs = TITLE_WORDS.len() * TITLE_NOUNS.len();
    let pair = index % pairs;
    let mut title = format!(
        "{} {}",
        TITLE_WORDS[pair % TITLE_WORDS.len()],
        TITLE_NOUNS[pair / TITLE_WORDS.len()]
    );
    if index >= pairs {
        title.push_str(&format!(" Part {}", index / pairs + 1));
    }

    let composer = if rng.gen_bool(0.35) {
        Some(pick(COMPOSERS, rng).to_owned())
    } else {
        None
    };
    let mut genres = vec![pick(GENRES, rng).to_owned()];
    if rng.gen_bool(0.3) {
        let second = pick(GENRES, rng).to_owned();
        if !genres.contains(&second) {
            genres.push(second);
        }
    }

    Work {
        title,
        artist: pick(ARTISTS, rng).to_owned(),
        composer,
        album: pick(ALBUMS, rng).to_owned(),
        genres,
        duration: rng.gen_range(120..=900),
    }
}

fn pick<'a>(pool: &[&'a str], rng: &mut StdRng) -> &'a str {
    pool[rng.gen_range(0..pool.len())]
}
