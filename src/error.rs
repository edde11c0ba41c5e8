use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the corpus tools.
///
/// Directory-level variants are fatal for a run. Per-file variants are
/// collected into the run's report and never abort the batch by themselves.
#[derive(Debug, Error)]
pub enum CorpusError {
    // ── Directory ─────────────────────────────────────────────────────────────
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("no CSV files found in {}", .0.display())]
    NoCsvFilesFound(PathBuf),

    #[error("path is not valid UTF-8: {}", .0.display())]
    InvalidPath(PathBuf),

    // ── Per file ──────────────────────────────────────────────────────────────
    #[error("cannot rename {} to {}: target already exists", .from.display(), .to.display())]
    RenameCollision { from: PathBuf, to: PathBuf },

    #[error("failed to replace {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl CorpusError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        CorpusError::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T, E = CorpusError> = std::result::Result<T, E>;
