use clap::builder::styling::AnsiColor;
use clap::builder::Styles;
use clap::{Parser, Subcommand};

use crate::seqio::Format;

const fn extra_build_info() -> &'static str {
    match option_env!("CARGO_BUILD_DESC") {
        Some(e) => e,
        None => env!("CARGO_PKG_VERSION"),
    }
}
pub const VERSION: &str = extra_build_info();
const INFO_STRING: &str = "
🧬 seqtools version ";
const AFTER_STRING: &str = "
   ──────────────────────────────────
   tools for reading, writing and generating sequence files";

// colouring of the help
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().bold())
    .usage(AnsiColor::BrightMagenta.on_default().bold())
    .literal(AnsiColor::BrightMagenta.on_default())
    .placeholder(AnsiColor::White.on_default());

#[derive(Parser)]
#[command(
    version = VERSION,
    about = format!("{}{}{}", INFO_STRING, VERSION, AFTER_STRING),
    arg_required_else_help = true,
    flatten_help = true,
    styles = STYLES
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Keep the first reads, or a random share of the reads, of a fastq file
    #[command(arg_required_else_help = true)]
    Sample {
        /// the input fastq file; `-` reads standard input
        #[arg(long, default_value = "-")]
        in1: String,

        /// the second input fastq file, for paired reads
        #[arg(long)]
        in2: Option<String>,

        /// the output fastq file; defaults to standard output
        #[arg(long)]
        out1: Option<String>,

        /// the second output fastq file (required with --in2)
        #[arg(long)]
        out2: Option<String>,

        /// keep the n first reads
        #[arg(short, conflicts_with = "proportion")]
        number: Option<usize>,

        /// keep each read with this probability, within [0,1]
        #[arg(short, long, value_parser = parse_proportion)]
        proportion: Option<f64>,

        /// seed for the proportion mode; drawn from entropy when absent
        #[arg(long)]
        seed: Option<u64>,

        /// inputs and outputs are gzip-compressed
        #[arg(long)]
        gz: bool,
    },

    /// Shuffle the order of the records of a sequence file
    Shuffle {
        /// the input sequence file; `-` reads standard input
        #[arg(long, default_value = "-")]
        input: String,

        /// the output sequence file; defaults to standard output
        #[arg(short)]
        output: Option<String>,

        /// sequence format of the input and output
        #[arg(long, default_value = "fasta")]
        format: Format,

        /// decompress the input (gz)
        #[arg(short)]
        decompress: bool,

        /// compress the output (gz)
        #[arg(short)]
        compress: bool,

        /// seed for the shuffle; drawn from entropy when absent
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Generate random sequences, optionally following an IUPAC pattern
    Random {
        /// the output sequence file; defaults to standard output
        #[arg(short)]
        output: Option<String>,

        /// output sequence format
        #[arg(long, default_value = "fasta")]
        format: Format,

        /// compress the output (gz)
        #[arg(short)]
        compress: bool,

        /// length of each generated sequence
        #[arg(long, default_value_t = 200)]
        length: usize,

        /// number of sequences to generate
        #[arg(short, default_value_t = 1)]
        number: usize,

        /// sequence id base name
        #[arg(long, default_value = "RandSeq_")]
        base: String,

        /// description attached to every generated sequence
        #[arg(long)]
        desc: Option<String>,

        /// pattern edit string: 1-based offsets followed by IUPAC codes,
        /// e.g. `1ATG` pins the first codon
        #[arg(long, verbatim_doc_comment)]
        pattern: Option<String>,

        /// seed for the generator; drawn from entropy when absent
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Report the length of every record as `id<TAB>length` rows
    Length {
        /// the input sequence file; `-` reads standard input
        #[arg(long, default_value = "-")]
        input: String,

        /// sequence format of the input
        #[arg(long, default_value = "fasta")]
        format: Format,

        /// the output file; defaults to standard output
        #[arg(short)]
        output: Option<String>,

        /// decompress the input (gz)
        #[arg(short)]
        decompress: bool,
    },
}

fn parse_proportion(arg: &str) -> Result<f64, String> {
    let p: f64 = arg
        .parse()
        .map_err(|_| format!("'{arg}' is not a number"))?;
    if !(0.0..=1.0).contains(&p) {
        return Err(indoc::formatdoc! {"
            the proportion must sit within [0,1], got '{arg}'. Expected usage is:
              -p 0.25
              -p 1
        "});
    }
    Ok(p)
}
