use thiserror::Error;

const DEFAULT_PHRED: u8 = 33;
const DEFAULT_RAW_SCORE: u8 = b'H';
const DEFAULT_VALUE: i32 = 40;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QualityError {
    #[error("quality scores are not consistent with any known Phred encoding")]
    InconsistentScores,
    #[error("could not determine the Phred encoding from the quality scores")]
    UnknownEncoding,
}

/// Per-base Phred quality, kept both as the raw score bytes and as decoded
/// numeric values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Quality {
    /// Offset of the encoding, 33 or 64, once known.
    pub phred: Option<u8>,
    pub raw: Vec<u8>,
    pub values: Vec<i32>,
}

impl Quality {
    pub fn with_phred(phred: u8) -> Quality {
        Quality {
            phred: Some(phred),
            ..Quality::default()
        }
    }

    /// Guess the Phred offset from the byte range of the scores. The two
    /// encodings overlap between 64 and 73; scores confined to that window
    /// cannot be attributed to either.
    fn detect_phred(raw: &[u8]) -> Result<u8, QualityError> {
        let min = *raw.iter().min().ok_or(QualityError::UnknownEncoding)?;
        let max = *raw.iter().max().ok_or(QualityError::UnknownEncoding)?;

        if min < 64 {
            return if max < 74 && min > 32 {
                Ok(33)
            } else {
                Err(QualityError::InconsistentScores)
            };
        }
        if max > 73 {
            return if min > 63 && max < 105 {
                Ok(64)
            } else {
                Err(QualityError::InconsistentScores)
            };
        }

        Err(QualityError::UnknownEncoding)
    }

    /// Append raw score bytes, detecting the Phred encoding on first use.
    /// The scores are stored even when detection fails; decoding then falls
    /// back to Phred+33 and the error is returned for the caller to report.
    pub fn push_raw(&mut self, raw: &[u8]) -> Result<(), QualityError> {
        let mut detected = Ok(());
        if self.phred.is_none() {
            match Quality::detect_phred(raw) {
                Ok(phred) => self.phred = Some(phred),
                Err(e) => detected = Err(e),
            }
        }

        let offset = self.phred.unwrap_or(DEFAULT_PHRED);
        self.raw.extend_from_slice(raw);
        self.values
            .extend(raw.iter().map(|&b| i32::from(b) - i32::from(offset)));

        detected
    }

    /// Default score used when writing sequences that carry no quality.
    pub fn fill_default(&mut self, n: usize) {
        self.phred = Some(DEFAULT_PHRED);
        self.raw.resize(self.raw.len() + n, DEFAULT_RAW_SCORE);
        self.values.resize(self.values.len() + n, DEFAULT_VALUE);
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Mean numeric score; 0.0 when no scores are present.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().map(|&v| f64::from(v)).sum::<f64>() / self.values.len() as f64
    }
}
