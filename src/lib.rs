//! Small utilities for reading, writing and annotating nucleotide sequence
//! files: fasta/fastq streaming, INSDC feature locations, and a few CLI
//! helpers built on top of them.

#[macro_use]
extern crate log;

pub mod cli;
pub mod feature;
pub mod length;
pub mod pattern;
pub mod quality;
pub mod random;
pub mod sample;
pub mod seq;
pub mod seqio;
pub mod shuffle;
