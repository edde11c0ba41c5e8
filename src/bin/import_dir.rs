//! Submit every CSV file in a directory to the dictionary engine's importer.
//!
//! Usage: import_dir DIR [--config import.yaml] [--command PROG]
//!                       [--timeout SECS] [--on-failure prompt|continue|stop]

use anyhow::{bail, Result};
use clap::Parser;
use sourashtra::{
    config::{FailureMode, ImportConfig},
    import::{self, policy, CommandImporter},
    logging,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Import CSV files into the dictionary engine")]
struct Args {
    /// Directory holding the CSV files
    dir: PathBuf,

    /// YAML file with import settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Import program to run per file
    #[arg(long)]
    command: Option<String>,

    /// Seconds before a single import is killed (0 = no limit)
    #[arg(long)]
    timeout: Option<u64>,

    /// What to do after a failed import
    #[arg(long, value_enum)]
    on_failure: Option<FailureMode>,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("info");
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ImportConfig::load(path)?,
        None => ImportConfig::default(),
    }
    .with_overrides(args.command, args.timeout, args.on_failure);
    info!(command = %config.command, timeout_secs = config.timeout_secs, on_failure = ?config.on_failure, "import settings");

    let importer = CommandImporter::from_config(&config);
    let mut policy = policy::for_mode(config.on_failure);
    let run = import::run_import(&args.dir, &importer, policy.as_mut()).await?;
    import::print_summary(&run);

    if !run.is_success() {
        bail!("{} import(s) failed", run.failed);
    }
    Ok(())
}
