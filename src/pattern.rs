use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("'{0}' is not a supported IUPAC nucleotide code")]
    UnknownCode(char),
    #[error("pattern offsets are 1-based; 0 is not a position")]
    ZeroOffset,
    #[error("the pattern offset '{0}' is too large to represent")]
    OffsetOverflow(String),
}

/// The IUPAC nucleotide alphabet: each code expands to the set of bases it
/// stands for. Index 0 is N, the unconstrained default.
const ALPHABET: [&[u8]; 15] = [
    b"ACGT", // N
    b"A",    // A
    b"C",    // C
    b"G",    // G
    b"T",    // T
    b"AG",   // R
    b"CT",   // Y
    b"GC",   // S
    b"AT",   // W
    b"GT",   // K
    b"AC",   // M
    b"CGT",  // B
    b"AGT",  // D
    b"ACT",  // H
    b"ACG",  // V
];

fn code_index(code: u8) -> Option<usize> {
    match code {
        b'N' => Some(0),
        b'A' => Some(1),
        b'C' => Some(2),
        b'G' => Some(3),
        b'T' => Some(4),
        b'R' => Some(5),
        b'Y' => Some(6),
        b'S' => Some(7),
        b'W' => Some(8),
        b'K' => Some(9),
        b'M' => Some(10),
        b'B' => Some(11),
        b'D' => Some(12),
        b'H' => Some(13),
        b'V' => Some(14),
        _ => None,
    }
}

lazy_static! {
    static ref EDIT_RE: Regex = Regex::new(r"([0-9]+)([A-Z]+)").unwrap();
}

/// A positional nucleotide pattern: each position holds the set of bases a
/// generated sequence may draw from. New patterns are N at every position.
#[derive(Debug, Clone)]
pub struct NuclPattern {
    positions: Vec<usize>,
}

impl NuclPattern {
    pub fn new(len: usize) -> NuclPattern {
        NuclPattern {
            positions: vec![0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Apply a pattern edit string: a run of `{offset}{CODES}` pairs, where
    /// the 1-based offset says where the codes are written, e.g. `1ATG21RY`.
    /// Codes running past the end of the pattern are dropped.
    pub fn edit(&mut self, spec: &str) -> Result<(), PatternError> {
        for cap in EDIT_RE.captures_iter(spec) {
            let offset: usize = cap[1]
                .parse()
                .map_err(|_| PatternError::OffsetOverflow(cap[1].to_string()))?;
            if offset == 0 {
                return Err(PatternError::ZeroOffset);
            }

            let mut at = offset - 1;
            for &code in cap[2].as_bytes() {
                if at >= self.positions.len() {
                    break;
                }
                self.positions[at] =
                    code_index(code).ok_or(PatternError::UnknownCode(code as char))?;
                at += 1;
            }
        }
        Ok(())
    }

    /// Draw one random sequence matching the pattern.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Vec<u8> {
        self.positions
            .iter()
            .map(|&p| {
                let set = ALPHABET[p];
                set[rng.gen_range(0..set.len())]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn default_pattern_draws_plain_nucleotides() {
        let pattern = NuclPattern::new(64);
        let mut rng = StdRng::seed_from_u64(17);
        let seq = pattern.generate(&mut rng);
        assert_eq!(seq.len(), 64);
        assert!(seq.iter().all(|b| b"ACGT".contains(b)));
    }

    #[test]
    fn edit_pins_positions() {
        let mut pattern = NuclPattern::new(10);
        pattern.edit("1ATG").unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let seq = pattern.generate(&mut rng);
            assert_eq!(&seq[..3], b"ATG");
        }
    }

    #[test]
    fn edit_accepts_several_runs() {
        let mut pattern = NuclPattern::new(8);
        pattern.edit("1AA5TT").unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let seq = pattern.generate(&mut rng);
        assert_eq!(&seq[..2], b"AA");
        assert_eq!(&seq[4..6], b"TT");
    }

    #[test]
    fn degenerate_codes_stay_in_their_set() {
        let mut pattern = NuclPattern::new(4);
        pattern.edit("1RYSW").unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let seq = pattern.generate(&mut rng);
            assert!(b"AG".contains(&seq[0]));
            assert!(b"CT".contains(&seq[1]));
            assert!(b"GC".contains(&seq[2]));
            assert!(b"AT".contains(&seq[3]));
        }
    }

    #[test]
    fn codes_past_the_end_are_dropped() {
        let mut pattern = NuclPattern::new(3);
        pattern.edit("3TTTTT").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let seq = pattern.generate(&mut rng);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq[2], b'T');
    }

    #[test]
    fn rejects_unknown_codes_and_zero_offsets() {
        let mut pattern = NuclPattern::new(10);
        assert_eq!(pattern.edit("1AXG"), Err(PatternError::UnknownCode('X')));
        assert_eq!(pattern.edit("0A"), Err(PatternError::ZeroOffset));
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let pattern = NuclPattern::new(40);
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        assert_eq!(pattern.generate(&mut a), pattern.generate(&mut b));
    }
}
