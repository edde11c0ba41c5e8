use anyhow::Result;
use clap::Parser;
use sourashtra::{
    config::{FailureMode, ImportConfig},
    import::{policy, CommandImporter},
    logging,
    pipeline,
};
use std::path::PathBuf;
use tracing::info;

/// Run the whole corpus pipeline on one directory:
/// sanitize names → add headers → check rows → import.
#[derive(Parser, Debug)]
#[command(author, version, about = "Normalize and import a Sourashtra dictionary corpus")]
struct Args {
    /// Directory holding the CSV files
    dir: PathBuf,

    /// YAML file with import settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// What to do after a failed import
    #[arg(long, value_enum)]
    on_failure: Option<FailureMode>,

    /// Stop after checking; do not call the importer
    #[arg(long)]
    skip_import: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    logging::init("info");
    let args = Args::parse();
    info!(dir = %args.dir.display(), "startup");

    let config = match &args.config {
        Some(path) => ImportConfig::load(path)?,
        None => ImportConfig::default(),
    }
    .with_overrides(None, None, args.on_failure);

    // ─── 2) run the stages ───────────────────────────────────────────
    let importer = (!args.skip_import).then(|| CommandImporter::from_config(&config));
    if let Some(importer) = &importer {
        info!(program = importer.program(), "importer ready");
    }
    let mut policy = policy::for_mode(config.on_failure);
    pipeline::run(&args.dir, importer.as_ref(), policy.as_mut()).await?;

    info!("all done");
    Ok(())
}
