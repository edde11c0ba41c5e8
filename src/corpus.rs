//! Shared corpus vocabulary: the canonical header, the record layout and
//! directory enumeration used by every tool.

use glob::{glob, Pattern};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{CorpusError, Result};

/// Column names, in file order.
pub const COLUMNS: [&str; 9] = [
    "Sourashtra Word",
    "Hindi Pronunciation",
    "Tamil Pronunciation",
    "Roman Readable",
    "Havard-Kyoto",
    "IAST",
    "IPA",
    "Meaning English",
    "Meaning Tamil",
];

/// The header line that marks a properly annotated dictionary file.
pub const CANONICAL_HEADER: &str = "Sourashtra Word,Hindi Pronunciation,Tamil Pronunciation,Roman Readable,Havard-Kyoto,IAST,IPA,Meaning English,Meaning Tamil";

/// Substring whose presence on the first line means the file is headered.
pub const HEADER_MARKER: &str = "Sourashtra Word";

/// One dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRecord {
    #[serde(rename = "Sourashtra Word")]
    pub word: String,
    #[serde(rename = "Hindi Pronunciation")]
    pub hindi: String,
    #[serde(rename = "Tamil Pronunciation")]
    pub tamil: String,
    #[serde(rename = "Roman Readable")]
    pub roman: String,
    #[serde(rename = "Havard-Kyoto")]
    pub harvard_kyoto: String,
    #[serde(rename = "IAST")]
    pub iast: String,
    #[serde(rename = "IPA")]
    pub ipa: String,
    #[serde(rename = "Meaning English")]
    pub meaning_english: String,
    #[serde(rename = "Meaning Tamil")]
    pub meaning_tamil: String,
}

impl CsvRecord {
    /// True when this row is the header itself rather than an entry.
    pub fn is_header(&self) -> bool {
        self.word == COLUMNS[0] && self.meaning_tamil == COLUMNS[8]
    }
}

/// Fail unless `dir` exists and is a directory.
pub fn require_dir(dir: &Path) -> Result<()> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(CorpusError::NotADirectory(dir.to_path_buf())),
        Err(_) => Err(CorpusError::DirectoryNotFound(dir.to_path_buf())),
    }
}

/// All regular `*.csv` files directly inside `dir`, sorted by name.
///
/// Non-recursive and case-sensitive on the extension, like a shell `*.csv`.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    require_dir(dir)?;
    let dir_str = dir
        .to_str()
        .ok_or_else(|| CorpusError::InvalidPath(dir.to_path_buf()))?;
    let pattern = format!("{}/*.csv", Pattern::escape(dir_str));

    // glob only fails on a malformed pattern, which escaping rules out
    let entries = glob(&pattern).map_err(|_| CorpusError::InvalidPath(dir.to_path_buf()))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// File name for logs, falling back to the full path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn header_matches_columns() {
        assert_eq!(CANONICAL_HEADER, COLUMNS.join(","));
        assert!(CANONICAL_HEADER.starts_with(HEADER_MARKER));
    }

    #[test]
    fn lists_only_csv_files_sorted() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("b.csv"), "x").unwrap();
        fs::write(tmp.path().join("a b.csv"), "x").unwrap();
        fs::write(tmp.path().join("notes.txt"), "x").unwrap();
        fs::write(tmp.path().join("upper.CSV"), "x").unwrap();
        fs::create_dir(tmp.path().join("dir.csv")).unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("nested").join("c.csv"), "x").unwrap();

        let names: Vec<String> = list_csv_files(tmp.path())
            .unwrap()
            .iter()
            .map(|p| display_name(p))
            .collect();
        assert_eq!(names, vec!["a b.csv", "b.csv"]);
    }

    #[test]
    fn glob_metacharacters_in_dir_are_literal() {
        let tmp = tempdir().unwrap();
        let odd = tmp.path().join("words [v2]");
        fs::create_dir(&odd).unwrap();
        fs::write(odd.join("fruits.csv"), "x").unwrap();

        let files = list_csv_files(&odd).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn missing_dir_is_reported() {
        let tmp = tempdir().unwrap();
        let missing = tmp.path().join("nope");
        assert!(matches!(
            list_csv_files(&missing),
            Err(CorpusError::DirectoryNotFound(p)) if p == missing
        ));

        let file = tmp.path().join("file.csv");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            require_dir(&file),
            Err(CorpusError::NotADirectory(_))
        ));
    }

    #[test]
    fn record_deserializes_from_header_row() {
        let data = format!("{}\nநீர்,,,nir,nIr,nīr,niːr,water,தண்ணீர்\n", CANONICAL_HEADER);
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let records: Vec<CsvRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].roman, "nir");
        assert_eq!(records[0].meaning_english, "water");
        assert!(!records[0].is_header());
    }
}
