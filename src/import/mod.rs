//! Batch import of a directory of CSV files into the external dictionary
//! engine.
//!
//! Files are submitted one at a time in name order. A failed file is recorded
//! and the [`FailurePolicy`] decides whether the rest of the batch runs; files
//! after an abort are never attempted and appear in no counter.

pub mod command;
pub mod policy;

use chrono::{DateTime, Utc};
use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};
use tracing::{error, info, warn};

pub use command::{CommandImporter, ImportFailure, Importer};
pub use policy::{ContinueOnFailure, FailurePolicy, Prompt, StopOnFirstFailure};

use crate::corpus;
use crate::error::{CorpusError, Result};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// No CSV files in the directory.
    Empty,
    /// Every discovered file was attempted.
    Completed,
    /// The policy declined to continue after a failure.
    Aborted,
}

#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: std::result::Result<(), ImportFailure>,
    pub elapsed: Duration,
}

/// Aggregate of one batch run. Never persisted.
#[derive(Debug)]
pub struct ImportRun {
    pub directory: PathBuf,
    pub discovered: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub status: RunStatus,
    pub outcomes: Vec<FileOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ImportRun {
    /// Files actually attempted.
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn not_attempted(&self) -> usize {
        self.discovered - self.total()
    }

    /// Exit status 0 only when nothing failed, even if the operator chose to
    /// continue past failures.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Import every `*.csv` in `dir`.
///
/// Only directory-level problems are errors; per-file failures are part of
/// the returned [`ImportRun`].
pub async fn run_import<I, P>(dir: &Path, importer: &I, policy: &mut P) -> Result<ImportRun>
where
    I: Importer,
    P: FailurePolicy + ?Sized,
{
    let started_at = Utc::now();
    corpus::require_dir(dir)?;
    let directory = fs::canonicalize(dir)
        .map_err(|e| CorpusError::io(format!("resolving {}", dir.display()), e))?;

    let files = corpus::list_csv_files(&directory)?;
    let mut run = ImportRun {
        directory,
        discovered: files.len(),
        succeeded: 0,
        failed: 0,
        status: RunStatus::Empty,
        outcomes: Vec::with_capacity(files.len()),
        started_at,
        finished_at: started_at,
    };

    if files.is_empty() {
        info!(dir = %run.directory.display(), "no CSV files to import");
        run.finished_at = Utc::now();
        return Ok(run);
    }

    info!(dir = %run.directory.display(), files = files.len(), "starting import");
    run.status = RunStatus::Completed;

    for path in files {
        let name = corpus::display_name(&path);
        let start = Instant::now();
        let result = importer.import(&path).await;
        let elapsed = start.elapsed();

        let keep_going = match &result {
            Ok(()) => {
                run.succeeded += 1;
                info!(file = %name, elapsed = ?elapsed, "imported");
                true
            }
            Err(failure) => {
                run.failed += 1;
                error!(file = %name, error = %failure, "import failed");
                policy.should_continue(&path, failure)
            }
        };
        run.outcomes.push(FileOutcome {
            path,
            result,
            elapsed,
        });

        if !keep_going {
            warn!(
                remaining = run.not_attempted(),
                "import aborted after failure"
            );
            run.status = RunStatus::Aborted;
            break;
        }
    }

    run.finished_at = Utc::now();
    Ok(run)
}

pub fn print_summary(run: &ImportRun) {
    let elapsed = run.finished_at - run.started_at;
    println!();
    println!("=== Import Summary ===");
    println!("Directory:       {}", run.directory.display());
    println!("Files processed: {}", run.total());
    println!("Successful:      {}", run.succeeded);
    println!("Failed:          {}", run.failed);
    if run.status == RunStatus::Aborted {
        println!("Not attempted:   {} (aborted)", run.not_attempted());
    }
    println!(
        "Elapsed:         {}.{:03}s",
        elapsed.num_seconds(),
        elapsed.num_milliseconds().rem_euclid(1000)
    );
    for outcome in run.outcomes.iter().filter(|o| o.result.is_err()) {
        if let Err(e) = &outcome.result {
            println!("  ✗ {}: {}", corpus::display_name(&outcome.path), e);
        }
    }
}
