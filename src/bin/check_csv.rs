//! Verify every CSV row has the expected number of fields.
//!
//! Usage: check_csv DIR [--fields N]

use anyhow::{bail, Result};
use clap::Parser;
use sourashtra::{logging, validate};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Check CSV files for the expected field count")]
struct Args {
    /// Directory holding the CSV files
    dir: PathBuf,

    /// Expected number of fields per line
    #[arg(short, long, default_value_t = validate::DEFAULT_FIELDS)]
    fields: usize,
}

fn main() -> Result<()> {
    logging::init("info");
    let args = Args::parse();
    if args.fields == 0 {
        bail!("number of fields must be positive");
    }

    let report = validate::check_dir(&args.dir, args.fields)?;
    validate::print_summary(&report);

    if !report.is_valid() {
        bail!("invalid CSV file found");
    }
    Ok(())
}
