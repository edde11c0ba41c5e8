//! Header normalization: make every CSV in a directory start with exactly one
//! canonical header line.

use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{error, info, instrument};

use crate::atomic::AtomicFile;
use crate::corpus::{self, CANONICAL_HEADER, HEADER_MARKER};
use crate::error::{CorpusError, Result};

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStatus {
    /// Header was prepended.
    Added,
    /// First line already carries the header; file untouched.
    AlreadyPresent,
}

#[derive(Debug)]
pub struct FileResult {
    pub path: PathBuf,
    pub outcome: Result<HeaderStatus>,
}

/// Per-run totals, in directory-listing order.
#[derive(Debug, Default)]
pub struct HeaderReport {
    pub directory: PathBuf,
    pub files: Vec<FileResult>,
}

impl HeaderReport {
    pub fn examined(&self) -> usize {
        self.files.len()
    }

    pub fn modified(&self) -> usize {
        self.count(HeaderStatus::Added)
    }

    pub fn skipped(&self) -> usize {
        self.count(HeaderStatus::AlreadyPresent)
    }

    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_err()).count()
    }

    fn count(&self, status: HeaderStatus) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, Ok(s) if s == status))
            .count()
    }
}

/// True if `first_line` already carries the canonical header marker.
pub fn has_header(first_line: &[u8]) -> bool {
    let marker = HEADER_MARKER.as_bytes();
    first_line.windows(marker.len()).any(|w| w == marker)
}

fn first_line(content: &[u8]) -> &[u8] {
    match content.iter().position(|&b| b == b'\n') {
        Some(idx) => &content[..idx],
        None => content,
    }
}

/// Ensure one file starts with the canonical header.
///
/// Content is handled as raw bytes, so non-UTF-8 files are prefixed without
/// being re-encoded.
#[instrument(level = "debug", skip(path), fields(file = %path.display()))]
pub fn normalize_file(path: &Path) -> Result<HeaderStatus> {
    let content = fs::read(path)
        .map_err(|e| CorpusError::io(format!("reading {}", path.display()), e))?;

    if has_header(first_line(&content)) {
        return Ok(HeaderStatus::AlreadyPresent);
    }

    let mut out = AtomicFile::new(path)?;
    out.write_all(CANONICAL_HEADER.as_bytes())?;
    out.write_all(b"\n")?;
    out.write_all(&content)?;
    out.commit()?;
    Ok(HeaderStatus::Added)
}

/// Normalize every `*.csv` in `dir`.
///
/// Per-file failures land in the report rather than aborting.
#[instrument(level = "info", skip(dir), fields(dir = %dir.display()))]
pub fn normalize_dir(dir: &Path) -> Result<HeaderReport> {
    let files = corpus::list_csv_files(dir)?;
    if files.is_empty() {
        return Err(CorpusError::NoCsvFilesFound(dir.to_path_buf()));
    }

    Ok(HeaderReport {
        directory: dir.to_path_buf(),
        files: normalize_files(files),
    })
}

/// Normalize the given files, in parallel, keeping their order in the result.
/// A failure on one file is recorded in its entry and never stops the rest.
pub fn normalize_files(files: Vec<PathBuf>) -> Vec<FileResult> {
    let results: Vec<FileResult> = files
        .into_par_iter()
        .map(|path| {
            let outcome = normalize_file(&path);
            FileResult { path, outcome }
        })
        .collect();

    for r in &results {
        let name = corpus::display_name(&r.path);
        match &r.outcome {
            Ok(HeaderStatus::Added) => info!(file = %name, "header added"),
            Ok(HeaderStatus::AlreadyPresent) => info!(file = %name, "header present, skipped"),
            Err(e) => error!(file = %name, error = %e, "header update failed"),
        }
    }
    results
}

/// Print the final summary table.
pub fn print_summary(report: &HeaderReport) {
    println!();
    println!("=== Header Summary ===");
    println!("Directory:      {}", report.directory.display());
    println!("Files examined: {}", report.examined());
    println!("Header added:   {}", report.modified());
    println!("Already had it: {}", report.skipped());
    println!("Failed:         {}", report.failed());
}
