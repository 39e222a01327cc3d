use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::seqio::{Format, Reader, Writer};

pub struct SampleOpts {
    /// Keep the n first reads.
    pub number: Option<usize>,
    /// Keep each read with this probability.
    pub proportion: Option<f64>,
    pub seed: Option<u64>,
    pub gzip: bool,
}

/// Subsample a fastq file, or a pair of fastq files in lockstep.
pub fn sample(
    in1: &str,
    in2: Option<&str>,
    out1: Option<&str>,
    out2: Option<&str>,
    opts: &SampleOpts,
) -> Result<()> {
    if opts.number.is_none() && opts.proportion.is_none() {
        bail!("choose a selection strategy: -n (n first reads) or -p (proportion of reads)");
    }
    if in2.is_some() && (out1.is_none() || out2.is_none()) {
        bail!("paired sampling cannot write to standard output; provide --out1 and --out2");
    }
    if in2.is_none() && out2.is_some() {
        bail!("--out2 only makes sense together with --in2");
    }

    match in2 {
        None => sample_single(in1, out1, opts),
        Some(in2) => sample_paired(in1, in2, out1.unwrap_or("-"), out2.unwrap_or("-"), opts),
    }
}

fn open(path: &str, gzip: bool) -> Result<Reader> {
    Reader::from_path(path, Format::Fastq, gzip).with_context(|| format!("unable to open {path}"))
}

fn sample_single(in1: &str, out1: Option<&str>, opts: &SampleOpts) -> Result<()> {
    let mut reader = open(in1, opts.gzip)?;
    let mut writer = Writer::from_path(out1, Format::Fastq, opts.gzip)?;

    let mut kept = 0usize;
    if let Some(n) = opts.number {
        for record in reader.by_ref() {
            if kept == n {
                break;
            }
            writer.write(&record?)?;
            kept += 1;
        }
        if kept < n {
            warn!("required {n} reads but the input contains only {kept}");
        }
    } else if let Some(p) = opts.proportion {
        let mut rng = seeded_rng(opts.seed);
        for record in reader {
            let record = record?;
            if rng.gen_bool(p) {
                writer.write(&record)?;
                kept += 1;
            }
        }
        info!("kept {kept} reads");
    }

    writer.finish()?;
    Ok(())
}

fn sample_paired(in1: &str, in2: &str, out1: &str, out2: &str, opts: &SampleOpts) -> Result<()> {
    let mut reader1 = open(in1, opts.gzip)?;
    let mut reader2 = open(in2, opts.gzip)?;
    let mut writer1 = Writer::from_path(Some(out1), Format::Fastq, opts.gzip)?;
    let mut writer2 = Writer::from_path(Some(out2), Format::Fastq, opts.gzip)?;

    let mut rng = seeded_rng(opts.seed);
    let mut kept = 0usize;
    let mut seen = 0usize;

    for (rec1, rec2) in reader1.by_ref().zip(reader2.by_ref()) {
        let rec1 = rec1?;
        let rec2 = rec2?;
        seen += 1;

        let keep = match (opts.number, opts.proportion) {
            (Some(n), _) => kept < n,
            (None, Some(p)) => rng.gen_bool(p),
            (None, None) => unreachable!("a selection strategy is checked upfront"),
        };
        if keep {
            writer1.write(&rec1)?;
            writer2.write(&rec2)?;
            kept += 1;
        }
        if opts.number == Some(kept) {
            break;
        }
    }

    if let Some(n) = opts.number {
        if kept < n {
            warn!("required {n} read pairs but the inputs contain only {seen}");
        }
    }
    if reader1.next().is_some() != reader2.next().is_some() {
        warn!("paired inputs do not hold the same number of reads");
    }

    writer1.finish()?;
    writer2.finish()?;
    info!("kept {kept} read pairs");
    Ok(())
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
    debug!("sampling with seed {seed}");
    StdRng::seed_from_u64(seed)
}
