use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::seqio::{Format, Reader, Writer};

/// Read every record into memory, shuffle their order, write them back out.
pub fn shuffle(
    input: &str,
    output: Option<&str>,
    format: Format,
    decompress: bool,
    compress: bool,
    seed: Option<u64>,
) -> Result<()> {
    let reader = Reader::from_path(input, format, decompress)
        .with_context(|| format!("unable to open {input}"))?;
    let mut records = reader.collect::<Result<Vec<_>, _>>()?;

    let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
    debug!("shuffling {} records with seed {seed}", records.len());
    let mut rng = StdRng::seed_from_u64(seed);
    records.shuffle(&mut rng);

    let mut writer = Writer::from_path(output, format, compress)?;
    for record in &records {
        writer.write(record)?;
    }
    writer.finish()?;

    Ok(())
}
