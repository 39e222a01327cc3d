use crate::quality::Quality;

/// A single sequence record: id, optional description, the residues, and
/// (for fastq inputs) the per-base quality.
#[derive(Debug, Clone, Default)]
pub struct Seq {
    pub id: String,
    pub desc: String,
    pub sequence: Vec<u8>,
    pub quality: Quality,
}

impl Seq {
    pub fn new(id: &str) -> Seq {
        Seq {
            id: id.to_string(),
            ..Seq::default()
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn set_sequence(&mut self, sequence: Vec<u8>) {
        self.sequence = sequence;
    }

    pub fn append_sequence(&mut self, chunk: &[u8]) {
        self.sequence.extend_from_slice(chunk);
    }
}
