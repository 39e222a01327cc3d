//! Streaming readers and writers for the supported sequence file formats,
//! with optional gzip compression on both sides.

mod fasta;
mod fastq;

pub use self::fasta::{FastaReader, FastaWriter};
pub use self::fastq::{FastqReader, FastqWriter};

use std::fs::File;
use std::io::{self, stdin, stdout, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use thiserror::Error;

use crate::seq::Seq;

#[derive(Error, Debug)]
pub enum SeqIoError {
    #[error("unsupported sequence format '{0}'")]
    UnsupportedFormat(String),
    #[error("record '{0}' has no sequence data, or the file is malformed")]
    EmptySequence(String),
    #[error("found sequence data before any record header")]
    MissingHeader,
    #[error("cannot write a record without a sequence id")]
    MissingId,
    #[error("truncated record '{0}': the file ends mid-record")]
    TruncatedRecord(String),
    #[error("the line '{0}' should start with '{1}'")]
    BadRecordStart(String, char),
    #[error("record '{0}' has mismatched sequence and quality lengths")]
    QualityLengthMismatch(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// The sequence file formats the toolkit understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Fasta,
    Fastq,
    /// Fastq parsed without its quality line, for speed.
    Fastnq,
}

impl FromStr for Format {
    type Err = SeqIoError;

    fn from_str(s: &str) -> Result<Format, SeqIoError> {
        match s {
            "fasta" | "fa" => Ok(Format::Fasta),
            "fastq" | "fq" => Ok(Format::Fastq),
            "fastnq" | "fnq" => Ok(Format::Fastnq),
            other => Err(SeqIoError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Anything that yields sequence records one at a time.
pub trait SeqRead {
    fn read_next(&mut self) -> Result<Option<Seq>, SeqIoError>;
}

/// Anything that can persist sequence records.
pub trait SeqWrite {
    fn write(&mut self, seq: &Seq) -> Result<(), SeqIoError>;
    fn flush(&mut self) -> Result<(), SeqIoError>;
}

/// Format-dispatching reader over a file, standard input, or a gzip stream
/// of either.
pub struct Reader {
    inner: Box<dyn SeqRead>,
}

impl Reader {
    /// Open `path` for reading; `-` (or the empty string) reads stdin.
    pub fn from_path(path: &str, format: Format, gzip: bool) -> Result<Reader, SeqIoError> {
        let raw: Box<dyn io::Read> = if path.is_empty() || path == "-" {
            Box::new(stdin())
        } else {
            Box::new(File::open(path)?)
        };
        let buf: Box<dyn BufRead> = if gzip {
            Box::new(BufReader::new(MultiGzDecoder::new(raw)))
        } else {
            Box::new(BufReader::new(raw))
        };
        Ok(Reader::from_bufread(buf, format))
    }

    pub fn from_bufread(buf: Box<dyn BufRead>, format: Format) -> Reader {
        let inner: Box<dyn SeqRead> = match format {
            Format::Fasta => Box::new(FastaReader::new(buf)),
            Format::Fastq => Box::new(FastqReader::new(buf)),
            Format::Fastnq => Box::new(FastqReader::without_quality(buf)),
        };
        Reader { inner }
    }
}

impl Iterator for Reader {
    type Item = Result<Seq, SeqIoError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.read_next().transpose()
    }
}

/// Format-dispatching writer to a file, standard output, or a gzip stream
/// of either.
pub struct Writer {
    inner: Box<dyn SeqWrite>,
}

impl Writer {
    /// Open `path` for writing; `None` or `-` writes to stdout.
    pub fn from_path(path: Option<&str>, format: Format, gzip: bool) -> Result<Writer, SeqIoError> {
        let raw: Box<dyn Write> = match path {
            Some(p) if p != "-" => Box::new(File::create(p)?),
            _ => Box::new(stdout()),
        };
        let buf: Box<dyn Write> = if gzip {
            Box::new(GzEncoder::new(raw, Compression::default()))
        } else {
            Box::new(BufWriter::new(raw))
        };
        Ok(Writer::from_write(buf, format))
    }

    pub fn from_write(output: Box<dyn Write>, format: Format) -> Writer {
        let inner: Box<dyn SeqWrite> = match format {
            Format::Fasta => Box::new(FastaWriter::new(output)),
            // fastnq records are plain fastq on the way out
            Format::Fastq | Format::Fastnq => Box::new(FastqWriter::new(output)),
        };
        Writer { inner }
    }

    pub fn write(&mut self, seq: &Seq) -> Result<(), SeqIoError> {
        self.inner.write(seq)
    }

    /// Flush buffered data. Call once all records are written.
    pub fn finish(mut self) -> Result<(), SeqIoError> {
        self.inner.flush()
    }
}

/// Read every record of `path` into memory, transparently decompressing
/// `.gz` inputs.
pub fn read_all(path: &str, format: Format) -> Result<Vec<Seq>, SeqIoError> {
    let gzip = Path::new(path)
        .extension()
        .map_or(false, |ext| ext == "gz");
    Reader::from_path(path, format, gzip)?.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn format_aliases() {
        assert_eq!("fasta".parse::<Format>().unwrap(), Format::Fasta);
        assert_eq!("fa".parse::<Format>().unwrap(), Format::Fasta);
        assert_eq!("fastq".parse::<Format>().unwrap(), Format::Fastq);
        assert_eq!("fq".parse::<Format>().unwrap(), Format::Fastq);
        assert_eq!("fnq".parse::<Format>().unwrap(), Format::Fastnq);
        assert!(matches!(
            "genbank".parse::<Format>(),
            Err(SeqIoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn reader_iterates_records() {
        let data = ">a\nACGT\n>b\nTTAA\n";
        let reader = Reader::from_bufread(Box::new(Cursor::new(data)), Format::Fasta);
        let records: Result<Vec<_>, _> = reader.collect();
        let records = records.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "a");
        assert_eq!(records[1].sequence, b"TTAA");
    }

    #[test]
    fn gzip_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reads.fasta.gz");
        let path = path.to_str().unwrap();

        let mut writer = Writer::from_path(Some(path), Format::Fasta, true).unwrap();
        let mut seq = crate::seq::Seq::new("gz1");
        seq.set_sequence(b"ACGTACGT".to_vec());
        writer.write(&seq).unwrap();
        writer.finish().unwrap();

        let records = read_all(path, Format::Fasta).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "gz1");
        assert_eq!(records[0].sequence, b"ACGTACGT");
    }
}
