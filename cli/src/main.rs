use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use fvewipe::Options;
use tracing::{Level, error};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Validates FVE volume metadata and optionally destroys the key material
#[derive(Parser, Debug)]
#[command(name = "fvewipe", version, about)]
struct Args {
    /// Offset into the device where the volume starts, in bytes
    #[arg(long, default_value_t = 0)]
    offset: u64,

    /// Show more information
    #[arg(short, long)]
    verbose: bool,

    /// Overwrite the volume header and metadata blocks with random data
    #[arg(long)]
    wipe: bool,

    /// Volume device or image file
    device: PathBuf,
}

impl From<&Args> for Options {
    fn from(args: &Args) -> Self {
        Options {
            offset: args.offset,
            verbose: args.verbose,
            wipe: args.wipe,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr.with_max_level(Level::WARN).or_else(std::io::stdout))
        .with_target(false)
        .without_time()
        .init();
}

fn run(args: &Args) -> anyhow::Result<ExitCode> {
    let mut device = OpenOptions::new()
        .read(true)
        .write(args.wipe)
        .open(&args.device)
        .with_context(|| format!("can't open {}", args.device.display()))?;

    let report = fvewipe::run(&mut device, &Options::from(args))?;

    let Some(wipe) = &report.wipe else {
        return Ok(ExitCode::SUCCESS);
    };
    if wipe.is_complete() {
        return Ok(ExitCode::SUCCESS);
    }

    error!(
        "wipe incomplete: {} of {} regions failed",
        wipe.failed.len(),
        report.plan.len()
    );
    Ok(ExitCode::FAILURE)
}
