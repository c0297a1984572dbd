//! Writes a generated music library to stdout as a JSON array of records.
//!
//! Usage: `gen-library [small|medium|large] [seed]`. Defaults to the medium
//! tier with seed 42. The output is accepted by `recmeta analyze`.

use std::error::Error;
use std::io::{BufWriter, Write as _};

use recmeta_bench::{SizeTier, generate_library};

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let tier = match args.next().as_deref() {
        None | Some("medium") => SizeTier::Medium,
        Some("small") => SizeTier::Small,
        Some("large") => SizeTier::Large,
        Some(other) => return Err(format!("unknown size tier: {other}").into()),
    };
    let seed = match args.next() {
        Some(seed) => seed.parse::<u64>()?,
        None => 42,
    };

    let library = generate_library(&tier.config(seed));
    eprintln!("Generated {} records ({tier:?}, seed {seed})", library.len());

    let stdout = std::io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    serde_json::to_writer_pretty(&mut writer, &library.records)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
