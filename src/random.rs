use anyhow::{ensure, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::pattern::NuclPattern;
use crate::seq::Seq;
use crate::seqio::{Format, Writer};

pub struct RandomOpts {
    pub length: usize,
    pub number: usize,
    /// Sequence id base name; ids are `{base}{index:06}`.
    pub base: String,
    pub desc: Option<String>,
    /// Pattern edit string applied before generation.
    pub pattern: Option<String>,
    pub seed: Option<u64>,
}

/// Generate random nucleotide sequences, optionally constrained by an IUPAC
/// pattern, and write them in the requested format.
pub fn generate(output: Option<&str>, format: Format, compress: bool, opts: &RandomOpts) -> Result<()> {
    ensure!(opts.length > 0, "the sequence length must be greater than 0");
    ensure!(opts.number > 0, "the number of sequences must be greater than 0");

    // report the seed so a generated set can be reproduced
    let seed = opts.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("using random seed {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    let mut pattern = NuclPattern::new(opts.length);
    if let Some(spec) = &opts.pattern {
        pattern
            .edit(spec)
            .with_context(|| format!("invalid pattern edit string '{spec}'"))?;
    }

    let mut writer = Writer::from_path(output, format, compress)?;
    for i in 0..opts.number {
        let mut seq = Seq::new(&format!("{}{:06}", opts.base, i));
        seq.set_sequence(pattern.generate(&mut rng));
        if let Some(desc) = &opts.desc {
            seq.desc = desc.clone();
        }
        writer.write(&seq)?;
    }
    writer.finish()?;

    Ok(())
}
