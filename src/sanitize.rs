use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{error, info, warn};

use crate::corpus;
use crate::error::{CorpusError, Result};

#[derive(Debug, Default)]
pub struct SanitizeReport {
    pub renamed: Vec<(PathBuf, PathBuf)>,
    pub unchanged: usize,
    /// Renames refused because the hyphenated name was already taken, or that
    /// failed at the filesystem level.
    pub failures: Vec<CorpusError>,
}

impl SanitizeReport {
    pub fn collisions(&self) -> usize {
        self.failures
            .iter()
            .filter(|e| matches!(e, CorpusError::RenameCollision { .. }))
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Replace every space with a hyphen. `None` when there is nothing to change.
pub fn hyphenate(name: &str) -> Option<String> {
    if name.contains(' ') {
        Some(name.replace(' ', "-"))
    } else {
        None
    }
}

/// Rename one file to its hyphenated form, refusing to overwrite.
pub fn sanitize_file(path: &Path) -> Result<Option<PathBuf>> {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return Err(CorpusError::InvalidPath(path.to_path_buf()));
    };
    let Some(new_name) = hyphenate(name) else {
        return Ok(None);
    };

    let target = path.with_file_name(new_name);
    if fs::symlink_metadata(&target).is_ok() {
        return Err(CorpusError::RenameCollision {
            from: path.to_path_buf(),
            to: target,
        });
    }

    fs::rename(path, &target).map_err(|e| {
        CorpusError::io(
            format!("renaming {} -> {}", path.display(), target.display()),
            e,
        )
    })?;
    Ok(Some(target))
}

/// Hyphenate the names of all `*.csv` files in `dir`.
pub fn sanitize_dir(dir: &Path) -> Result<SanitizeReport> {
    let files = corpus::list_csv_files(dir)?;
    let mut report = SanitizeReport::default();

    for path in files {
        match sanitize_file(&path) {
            Ok(Some(target)) => {
                info!(
                    from = %corpus::display_name(&path),
                    to = %corpus::display_name(&target),
                    "renamed"
                );
                report.renamed.push((path, target));
            }
            Ok(None) => report.unchanged += 1,
            Err(e @ CorpusError::RenameCollision { .. }) => {
                warn!(error = %e, "rename skipped");
                report.failures.push(e);
            }
            Err(e) => {
                error!(error = %e, "rename failed");
                report.failures.push(e);
            }
        }
    }

    Ok(report)
}

pub fn print_summary(dir: &Path, report: &SanitizeReport) {
    println!();
    println!("=== Rename Summary ===");
    println!("Directory:  {}", dir.display());
    println!("Renamed:    {}", report.renamed.len());
    println!("Unchanged:  {}", report.unchanged);
    println!("Collisions: {}", report.collisions());
    println!(
        "Failures:   {}",
        report.failures.len() - report.collisions()
    );
}
