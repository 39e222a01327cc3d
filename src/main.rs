#[macro_use]
extern crate log;

use anyhow::Result;
use clap::Parser;

use seqtools::cli::{Cli, Commands};
use seqtools::{length, random, sample, shuffle};

fn try_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Sample {
            in1,
            in2,
            out1,
            out2,
            number,
            proportion,
            seed,
            gz,
        } => {
            let opts = sample::SampleOpts {
                number: *number,
                proportion: *proportion,
                seed: *seed,
                gzip: *gz,
            };
            sample::sample(in1, in2.as_deref(), out1.as_deref(), out2.as_deref(), &opts)?;
        }
        Commands::Shuffle {
            input,
            output,
            format,
            decompress,
            compress,
            seed,
        } => {
            shuffle::shuffle(input, output.as_deref(), *format, *decompress, *compress, *seed)?;
        }
        Commands::Random {
            output,
            format,
            compress,
            length,
            number,
            base,
            desc,
            pattern,
            seed,
        } => {
            let opts = random::RandomOpts {
                length: *length,
                number: *number,
                base: base.clone(),
                desc: desc.clone(),
                pattern: pattern.clone(),
                seed: *seed,
            };
            random::generate(output.as_deref(), *format, *compress, &opts)?;
        }
        Commands::Length {
            input,
            format,
            output,
            decompress,
        } => {
            length::lengths(input, *format, output.as_deref(), *decompress)?;
        }
    };
    Ok(())
}

fn main() {
    if let Err(err) = try_main() {
        error!("{}", err);

        // report any errors that are produced
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  because: {}", cause));

        std::process::exit(1);
    }
}
