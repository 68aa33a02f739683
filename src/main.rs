//! Command line front end: convert one ANTs affine `.mat` file into an
//! FSL matrix file.

use ants2fsl::{convert_file, ConvertError};
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;
use std::process;

/// Convert an ANTs/ITK affine transform into an FSL matrix.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the ANTs transform (`.mat` MAT-file).
    #[arg(long)]
    input_path: PathBuf,

    /// Path of the FSL matrix to write.
    #[arg(long)]
    output_path: PathBuf,

    /// Increase logging verbosity (repeat for more). `RUST_LOG` overrides this.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(level_for(args.verbose))
        .parse_default_env()
        .init();

    if let Err(err) = try_main(&args) {
        eprintln!("error: {} failed: {}", err.stage(), err);
        process::exit(1);
    }
}

fn try_main(args: &Args) -> Result<(), ConvertError> {
    let _ = convert_file(&args.input_path, &args.output_path)?;
    Ok(())
}
