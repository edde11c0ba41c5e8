//! Prepend the canonical header to every CSV file that lacks it.
//!
//! Usage: add_headers DIR

use anyhow::{bail, Result};
use clap::Parser;
use sourashtra::{header, logging};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Ensure every CSV starts with the dictionary header")]
struct Args {
    /// Directory holding the CSV files
    dir: PathBuf,
}

fn main() -> Result<()> {
    logging::init("info");
    let args = Args::parse();

    let report = header::normalize_dir(&args.dir)?;
    header::print_summary(&report);

    if report.failed() > 0 {
        bail!("{} file(s) could not be updated", report.failed());
    }
    Ok(())
}
