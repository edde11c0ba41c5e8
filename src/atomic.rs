//! Whole-file replacement with commit-or-discard semantics.
//!
//! Bytes go to a scratch file created next to the destination, then the
//! scratch file is renamed over the destination on `commit()`. Dropping an
//! `AtomicFile` without committing deletes the scratch file and leaves the
//! destination untouched.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{CorpusError, Result};

pub struct AtomicFile {
    writer: BufWriter<NamedTempFile>,
    final_path: PathBuf,
}

impl AtomicFile {
    /// Creates a scratch file in the same directory as `final_path` so the
    /// final rename never crosses filesystems.
    pub fn new(final_path: impl AsRef<Path>) -> Result<Self> {
        let final_path = final_path.as_ref().to_path_buf();
        let parent = match final_path.parent() {
            Some(p) if p.as_os_str().is_empty() => Path::new("."),
            Some(p) => p,
            None => return Err(CorpusError::InvalidPath(final_path.clone())),
        };

        let scratch = NamedTempFile::new_in(parent).map_err(|source| CorpusError::WriteFailure {
            path: final_path.clone(),
            source,
        })?;

        Ok(Self {
            writer: BufWriter::new(scratch),
            final_path,
        })
    }

    pub fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer
            .write_all(bytes)
            .map_err(|source| CorpusError::WriteFailure {
                path: self.final_path.clone(),
                source,
            })
    }

    /// Flush, carry over the destination's permissions if it exists, and
    /// rename the scratch file into place.
    ///
    /// On error the scratch file is removed and the destination is unchanged.
    pub fn commit(self) -> Result<PathBuf> {
        let final_path = self.final_path;
        let fail = |source: std::io::Error| CorpusError::WriteFailure {
            path: final_path.clone(),
            source,
        };

        let scratch = self.writer.into_inner().map_err(|e| fail(e.into_error()))?;
        scratch.as_file().sync_all().map_err(fail)?;

        // NamedTempFile is created 0600; keep whatever mode the original had.
        if let Ok(meta) = fs::metadata(&final_path) {
            if meta.is_file() {
                scratch
                    .as_file()
                    .set_permissions(meta.permissions())
                    .map_err(fail)?;
            }
        }

        // PersistError owns the scratch file; dropping it deletes the file.
        scratch.persist(&final_path).map_err(|e| fail(e.error))?;
        Ok(final_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn commit_replaces_contents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fruits.csv");
        fs::write(&path, "OLD").unwrap();

        let mut file = AtomicFile::new(&path).unwrap();
        file.write_all(b"NEW\n").unwrap();
        let written = file.commit().unwrap();

        assert_eq!(written, path);
        assert_eq!(fs::read_to_string(&path).unwrap(), "NEW\n");
        assert_eq!(entries(tmp.path()), vec!["fruits.csv"]);
    }

    #[test]
    fn drop_without_commit_discards_scratch() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fruits.csv");
        fs::write(&path, "ORIGINAL").unwrap();

        {
            let mut file = AtomicFile::new(&path).unwrap();
            file.write_all(b"half written").unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "ORIGINAL");
        assert_eq!(entries(tmp.path()), vec!["fruits.csv"]);
    }

    #[test]
    fn failed_swap_keeps_destination_and_removes_scratch() {
        let tmp = TempDir::new().unwrap();
        // A non-empty directory cannot be replaced by a file rename.
        let target = tmp.path().join("birds.csv");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep.txt"), "still here").unwrap();

        let mut file = AtomicFile::new(&target).unwrap();
        file.write_all(b"data").unwrap();
        let err = file.commit().unwrap_err();

        assert!(matches!(err, CorpusError::WriteFailure { .. }));
        assert_eq!(entries(tmp.path()), vec!["birds.csv"]);
        assert_eq!(
            fs::read_to_string(target.join("keep.txt")).unwrap(),
            "still here"
        );
    }

    #[cfg(unix)]
    #[test]
    fn commit_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("colors.csv");
        fs::write(&path, "x").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let mut file = AtomicFile::new(&path).unwrap();
        file.write_all(b"y").unwrap();
        file.commit().unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }
}
