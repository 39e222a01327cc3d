use std::io::{BufRead, Write};

use super::{SeqIoError, SeqRead, SeqWrite};
use crate::quality::Quality;
use crate::seq::Seq;

const ID_PREFIX: u8 = b'@';
const SPACER_PREFIX: u8 = b'+';

/// Streaming fastq reader over strict four-line records.
pub struct FastqReader<R> {
    input: R,
    line: String,
    keep_quality: bool,
    eof: bool,
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(input: R) -> Self {
        FastqReader {
            input,
            line: String::new(),
            keep_quality: true,
            eof: false,
        }
    }

    /// A faster variant that stores no quality scores.
    pub fn without_quality(input: R) -> Self {
        FastqReader {
            keep_quality: false,
            ..FastqReader::new(input)
        }
    }

    fn next_line(&mut self) -> Result<bool, SeqIoError> {
        self.line.clear();
        Ok(self.input.read_line(&mut self.line)? != 0)
    }

    fn trimmed(&self) -> &str {
        self.line.trim_end_matches(['\n', '\r'])
    }
}

impl<R: BufRead> SeqRead for FastqReader<R> {
    fn read_next(&mut self) -> Result<Option<Seq>, SeqIoError> {
        if self.eof {
            return Ok(None);
        }

        // id line; blank lines between records are tolerated
        loop {
            if !self.next_line()? {
                self.eof = true;
                return Ok(None);
            }
            if !self.trimmed().is_empty() {
                break;
            }
        }

        let header = self.trimmed();
        if header.as_bytes()[0] != ID_PREFIX {
            return Err(SeqIoError::BadRecordStart(header.to_string(), '@'));
        }
        let mut seq = Seq::new(&header[1..]);

        if !self.next_line()? {
            return Err(SeqIoError::TruncatedRecord(seq.id.clone()));
        }
        seq.append_sequence(self.trimmed().as_bytes());

        if !self.next_line()? {
            return Err(SeqIoError::TruncatedRecord(seq.id.clone()));
        }
        let spacer = self.trimmed();
        if spacer.as_bytes().first() != Some(&SPACER_PREFIX) {
            return Err(SeqIoError::BadRecordStart(spacer.to_string(), '+'));
        }

        if !self.next_line()? {
            return Err(SeqIoError::TruncatedRecord(seq.id.clone()));
        }
        if self.keep_quality {
            // an undetermined Phred encoding is worth a note, not a failure
            if let Err(e) = seq.quality.push_raw(self.trimmed().as_bytes()) {
                warn!("record '{}': {}", seq.id, e);
            }
        }

        Ok(Some(seq))
    }
}

/// Fastq writer. Records without quality get the default score.
pub struct FastqWriter<W> {
    output: W,
    pub count: usize,
}

impl<W: Write> FastqWriter<W> {
    pub fn new(output: W) -> Self {
        FastqWriter { output, count: 0 }
    }
}

impl<W: Write> SeqWrite for FastqWriter<W> {
    fn write(&mut self, seq: &Seq) -> Result<(), SeqIoError> {
        if seq.id.is_empty() {
            return Err(SeqIoError::MissingId);
        }
        if seq.is_empty() {
            return Err(SeqIoError::EmptySequence(seq.id.clone()));
        }

        let generated;
        let raw: &[u8] = if seq.quality.is_empty() {
            let mut quality = Quality::default();
            quality.fill_default(seq.len());
            generated = quality;
            &generated.raw
        } else {
            &seq.quality.raw
        };
        if raw.len() != seq.len() {
            return Err(SeqIoError::QualityLengthMismatch(seq.id.clone()));
        }

        writeln!(self.output, "@{}", seq.id)?;
        self.output.write_all(&seq.sequence)?;
        self.output.write_all(b"\n+\n")?;
        self.output.write_all(raw)?;
        self.output.write_all(b"\n")?;

        self.count += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SeqIoError> {
        Ok(self.output.flush()?)
    }
}
