//! Remove bracketed clarification terms like `(adj)` from CSV fields.
//!
//! Usage: cleanup_brackets DIR [OUT_DIR] [--dry-run] [--no-diff | --diff-only]

use anyhow::{bail, Result};
use clap::Parser;
use sourashtra::{cleanup, logging};
use std::path::PathBuf;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(author, version, about = "Strip (adj), (noun), (N) ... terms from CSV files")]
struct Args {
    /// Directory holding the CSV files
    dir: PathBuf,

    /// Write cleaned files here instead of overwriting the originals
    out_dir: Option<PathBuf>,

    /// Report what would change without writing anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Do not print the unified diff
    #[arg(long, conflicts_with = "diff_only")]
    no_diff: bool,

    /// Print only the unified diff, not the per-line changes
    #[arg(long)]
    diff_only: bool,
}

fn main() -> Result<()> {
    logging::init("info");
    let args = Args::parse();

    if args.out_dir.is_none() && !args.dry_run {
        warn!(dir = %args.dir.display(), "files will be overwritten in place");
    }
    let report = cleanup::cleanup_dir(&args.dir, args.out_dir.as_deref(), args.dry_run)?;
    let show = cleanup::ShowChanges {
        lines: !args.diff_only,
        diff: !args.no_diff,
    };
    cleanup::print_summary(&report, show);

    if report.failed() > 0 {
        bail!("{} file(s) could not be cleaned", report.failed());
    }
    Ok(())
}
