use std::io::{BufRead, Write};

use super::{SeqIoError, SeqRead, SeqWrite};
use crate::seq::Seq;

const ID_PREFIX: u8 = b'>';
const LINE_LENGTH: usize = 60;

/// Streaming fasta reader. Sequences may span any number of lines; blank
/// lines are tolerated.
pub struct FastaReader<R> {
    input: R,
    line: String,
    /// Header of the next record, consumed while finishing the previous one.
    pending: Option<(String, String)>,
    eof: bool,
}

fn parse_header(line: &str) -> (String, String) {
    match line.split_once(' ') {
        Some((id, desc)) => (id.to_string(), desc.to_string()),
        None => (line.to_string(), String::new()),
    }
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(input: R) -> Self {
        FastaReader {
            input,
            line: String::new(),
            pending: None,
            eof: false,
        }
    }
}

impl<R: BufRead> SeqRead for FastaReader<R> {
    fn read_next(&mut self) -> Result<Option<Seq>, SeqIoError> {
        if self.eof {
            return Ok(None);
        }

        let mut seq = Seq::default();
        if let Some((id, desc)) = self.pending.take() {
            seq.id = id;
            seq.desc = desc;
        }

        loop {
            self.line.clear();
            if self.input.read_line(&mut self.line)? == 0 {
                break;
            }
            let line = self.line.trim_end_matches(['\n', '\r']);
            if line.is_empty() {
                continue;
            }

            if line.as_bytes()[0] == ID_PREFIX {
                let (id, desc) = parse_header(&line[1..]);
                if seq.id.is_empty() {
                    if !seq.is_empty() {
                        return Err(SeqIoError::MissingHeader);
                    }
                    seq.id = id;
                    seq.desc = desc;
                } else {
                    // the next record begins; keep its header for later
                    if seq.is_empty() {
                        return Err(SeqIoError::EmptySequence(seq.id));
                    }
                    self.pending = Some((id, desc));
                    return Ok(Some(seq));
                }
            } else {
                seq.append_sequence(line.as_bytes());
            }
        }

        self.eof = true;
        if seq.id.is_empty() {
            if seq.is_empty() {
                return Ok(None);
            }
            return Err(SeqIoError::MissingHeader);
        }
        if seq.is_empty() {
            return Err(SeqIoError::EmptySequence(seq.id));
        }
        Ok(Some(seq))
    }
}

/// Fasta writer wrapping sequence lines at 60 columns.
pub struct FastaWriter<W> {
    output: W,
    pub count: usize,
}

impl<W: Write> FastaWriter<W> {
    pub fn new(output: W) -> Self {
        FastaWriter { output, count: 0 }
    }
}

impl<W: Write> SeqWrite for FastaWriter<W> {
    fn write(&mut self, seq: &Seq) -> Result<(), SeqIoError> {
        if seq.id.is_empty() {
            return Err(SeqIoError::MissingId);
        }

        if seq.desc.is_empty() {
            writeln!(self.output, ">{}", seq.id)?;
        } else {
            writeln!(self.output, ">{} {}", seq.id, seq.desc)?;
        }
        for chunk in seq.sequence.chunks(LINE_LENGTH) {
            self.output.write_all(chunk)?;
            self.output.write_all(b"\n")?;
        }

        self.count += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SeqIoError> {
        Ok(self.output.flush()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_records(data: &str) -> Result<Vec<Seq>, SeqIoError> {
        let mut reader = FastaReader::new(Cursor::new(data.to_string()));
        let mut records = Vec::new();
        while let Some(seq) = reader.read_next()? {
            records.push(seq);
        }
        Ok(records)
    }

    #[test]
    fn reads_multi_line_records() {
        let records = read_records(">s1 first sequence\nACGT\nTTGA\n>s2\nGGCC\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "s1");
        assert_eq!(records[0].desc, "first sequence");
        assert_eq!(records[0].sequence, b"ACGTTTGA");
        assert_eq!(records[1].id, "s2");
        assert_eq!(records[1].desc, "");
        assert_eq!(records[1].sequence, b"GGCC");
    }

    #[test]
    fn tolerates_blank_lines() {
        let records = read_records(">s1\nACGT\n\n\n>s2\nTT\n\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].sequence, b"TT");
    }

    #[test]
    fn empty_input_yields_no_records() {
        assert!(read_records("").unwrap().is_empty());
        assert!(read_records("\n\n").unwrap().is_empty());
    }

    #[test]
    fn rejects_a_record_without_sequence() {
        assert!(matches!(
            read_records(">s1\n>s2\nACGT\n"),
            Err(SeqIoError::EmptySequence(id)) if id == "s1"
        ));
        assert!(matches!(
            read_records(">s1\nACGT\n>s2\n"),
            Err(SeqIoError::EmptySequence(id)) if id == "s2"
        ));
    }

    #[test]
    fn rejects_sequence_before_any_header() {
        assert!(matches!(
            read_records("ACGT\n>s1\nTT\n"),
            Err(SeqIoError::MissingHeader)
        ));
    }

    #[test]
    fn writer_wraps_at_sixty_columns() {
        let mut out = Vec::new();
        {
            let mut writer = FastaWriter::new(&mut out);
            let mut seq = Seq::new("s1");
            seq.desc = "demo".to_string();
            seq.set_sequence(vec![b'A'; 130]);
            writer.write(&seq).unwrap();
            writer.flush().unwrap();
            assert_eq!(writer.count, 1);
        }

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], ">s1 demo");
        assert_eq!(lines[1].len(), 60);
        assert_eq!(lines[2].len(), 60);
        assert_eq!(lines[3].len(), 10);
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn writer_rejects_a_missing_id() {
        let mut out = Vec::new();
        let mut writer = FastaWriter::new(&mut out);
        let seq = Seq::default();
        assert!(matches!(writer.write(&seq), Err(SeqIoError::MissingId)));
    }

    #[test]
    fn round_trip() {
        let input = ">s1 desc here\nACGTACGT\n>s2\nTTTT\n";
        let records = read_records(input).unwrap();

        let mut out = Vec::new();
        let mut writer = FastaWriter::new(&mut out);
        for seq in &records {
            writer.write(seq).unwrap();
        }
        assert_eq!(String::from_utf8(out).unwrap(), input);
    }
}
