#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]

mod cli;
mod output;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use flv::FlvParser;
use tracing::{Level, debug};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::cli::Args;
use crate::output::OutputManager;

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let file = File::open(&args.file)
        .with_context(|| format!("failed to open {}", args.file.display()))?;
    let mut reader = BufReader::new(file);

    debug!(path = %args.file.display(), "inspecting file");
    let (info, diagnostics) = FlvParser::new(&mut reader)
        .parse()
        .with_context(|| format!("failed to parse {}", args.file.display()))?;

    let report = OutputManager::new(!args.no_metadata, args.verbose).format_report(&info, &diagnostics);

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(report.as_bytes())
        .context("failed to write report")?;
    stdout.flush().context("failed to write report")?;
    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_level(verbose),
        )
        .init();
}
