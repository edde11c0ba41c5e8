//! The whole corpus pipeline on one directory: sanitize names, add headers,
//! check rows, import.
//!
//! A directory without CSV files is not an error here. Nothing runs past the
//! rename stage and the pipeline ends as `NoFiles`, the same way an import of
//! an empty directory succeeds.

use anyhow::{bail, Result};
use std::path::Path;
use tracing::{error, info, warn};

use crate::corpus;
use crate::header;
use crate::import::{self, FailurePolicy, ImportRun, Importer};
use crate::sanitize;
use crate::validate;

/// Where a successful pipeline run stopped.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// The directory holds no CSV files.
    NoFiles,
    /// Every file was checked and no importer was given.
    Checked,
    Imported(ImportRun),
}

/// Run each stage in turn, bailing out as soon as one reports a failure.
/// With `importer` set to `None` the run stops after the check.
pub async fn run<I, P>(dir: &Path, importer: Option<&I>, policy: &mut P) -> Result<PipelineOutcome>
where
    I: Importer,
    P: FailurePolicy + ?Sized,
{
    // ─── 1) sanitize file names ──────────────────────────────────────
    let renamed = sanitize::sanitize_dir(dir)?;
    sanitize::print_summary(dir, &renamed);
    if !renamed.is_clean() {
        error!("rename failures; fix them before continuing");
        bail!("{} file(s) could not be renamed", renamed.failures.len());
    }

    if corpus::list_csv_files(dir)?.is_empty() {
        warn!(dir = %dir.display(), "no CSV files, nothing to do");
        return Ok(PipelineOutcome::NoFiles);
    }

    // ─── 2) ensure headers ───────────────────────────────────────────
    let headers = header::normalize_dir(dir)?;
    header::print_summary(&headers);
    if headers.failed() > 0 {
        bail!("{} file(s) could not be updated", headers.failed());
    }

    // ─── 3) check rows ───────────────────────────────────────────────
    let checked = validate::check_dir(dir, validate::DEFAULT_FIELDS)?;
    validate::print_summary(&checked);
    if !checked.is_valid() {
        bail!("invalid CSV file found; not importing");
    }

    let Some(importer) = importer else {
        info!("import skipped");
        return Ok(PipelineOutcome::Checked);
    };

    // ─── 4) import ───────────────────────────────────────────────────
    let run = import::run_import(dir, importer, policy).await?;
    import::print_summary(&run);
    if !run.is_success() {
        bail!("{} import(s) failed", run.failed);
    }
    Ok(PipelineOutcome::Imported(run))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CANONICAL_HEADER;
    use crate::import::{ContinueOnFailure, ImportFailure};
    use crate::logging::init_test_logging;
    use std::fs;
    use std::future::Future;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingImporter {
        calls: Mutex<Vec<String>>,
    }

    impl Importer for RecordingImporter {
        fn import(
            &self,
            path: &Path,
        ) -> impl Future<Output = std::result::Result<(), ImportFailure>> + Send {
            self.calls.lock().unwrap().push(corpus::display_name(path));
            async { Ok(()) }
        }
    }

    const ROW: &str = "ஆம்பு,,,aambu,,,,water,தண்ணீர்\n";

    #[tokio::test]
    async fn empty_directory_finishes_without_importing() {
        init_test_logging();
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("notes.txt"), "not csv").unwrap();
        let importer = RecordingImporter::default();

        let outcome = run(tmp.path(), Some(&importer), &mut ContinueOnFailure)
            .await
            .unwrap();

        assert!(matches!(outcome, PipelineOutcome::NoFiles));
        assert!(importer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn renames_heads_checks_and_imports() {
        init_test_logging();
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("body parts.csv"), ROW).unwrap();
        fs::write(tmp.path().join("water.csv"), ROW).unwrap();
        let importer = RecordingImporter::default();

        let outcome = run(tmp.path(), Some(&importer), &mut ContinueOnFailure)
            .await
            .unwrap();

        let run = match outcome {
            PipelineOutcome::Imported(run) => run,
            other => panic!("expected an import run, got {:?}", other),
        };
        assert_eq!(run.succeeded, 2);
        assert_eq!(
            *importer.calls.lock().unwrap(),
            vec!["body-parts.csv", "water.csv"]
        );
        let content = fs::read_to_string(tmp.path().join("body-parts.csv")).unwrap();
        assert_eq!(content, format!("{}\n{}", CANONICAL_HEADER, ROW));
    }

    #[tokio::test]
    async fn invalid_rows_stop_before_import() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("short.csv"), "only,three,fields\n").unwrap();
        let importer = RecordingImporter::default();

        let err = run(tmp.path(), Some(&importer), &mut ContinueOnFailure)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("invalid CSV file"));
        assert!(importer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn without_importer_stops_after_check() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("water.csv"), ROW).unwrap();

        let outcome = run::<RecordingImporter, _>(tmp.path(), None, &mut ContinueOnFailure)
            .await
            .unwrap();
        assert!(matches!(outcome, PipelineOutcome::Checked));
    }
}
