use std::fs::File;
use std::io::{stdout, Write};

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;

use crate::seqio::{Format, Reader};

#[derive(Serialize)]
struct LengthRecord<'a> {
    id: &'a str,
    length: usize,
}

/// Report the length of every record as tab-separated `id length` rows.
pub fn lengths(input: &str, format: Format, output: Option<&str>, decompress: bool) -> Result<()> {
    let reader = Reader::from_path(input, format, decompress)
        .with_context(|| format!("unable to open {input}"))?;

    let out: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(stdout()),
    };
    let mut wtr = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(out);

    for record in reader {
        let record = record?;
        wtr.serialize(LengthRecord {
            id: &record.id,
            length: record.len(),
        })?;
    }
    wtr.flush()?;

    Ok(())
}
