//! Replace spaces with hyphens in the names of `*.csv` files.
//!
//! Usage: sanitize_filenames [DIR]   (defaults to the current directory)

use anyhow::{bail, Result};
use clap::Parser;
use sourashtra::{logging, sanitize};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Hyphenate spaces in CSV file names")]
struct Args {
    /// Directory holding the CSV files
    #[arg(default_value = ".")]
    dir: PathBuf,
}

fn main() -> Result<()> {
    logging::init("info");
    let args = Args::parse();

    info!(dir = %args.dir.display(), "sanitizing file names");
    let report = sanitize::sanitize_dir(&args.dir)?;
    sanitize::print_summary(&args.dir, &report);

    if !report.is_clean() {
        bail!("{} file(s) could not be renamed", report.failures.len());
    }
    Ok(())
}
