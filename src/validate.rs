//! Field-count validation for corpus files.
//!
//! Rows are parsed with standard CSV quoting. Blank rows are ignored; every
//! other row must have exactly the expected number of fields and a non-empty
//! Sourashtra word. Checking stops at the first invalid file.

use csv::{ReaderBuilder, StringRecord};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::corpus::{self, CsvRecord, COLUMNS};
use crate::error::Result;

pub const DEFAULT_FIELDS: usize = COLUMNS.len();

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemKind {
    FieldCount { expected: usize, found: usize },
    EmptyWord,
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowProblem {
    /// 1-based line; 0 when the file could not be opened.
    pub line: u64,
    pub kind: ProblemKind,
    pub content: String,
}

impl std::fmt::Display for RowProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ProblemKind::FieldCount { expected, found } => write!(
                f,
                "line {}: found {} fields instead of {}",
                self.line, found, expected
            ),
            ProblemKind::EmptyWord => write!(f, "line {}: empty Sourashtra word", self.line),
            ProblemKind::Unreadable(msg) => write!(f, "line {}: {}", self.line, msg),
        }
    }
}

#[derive(Debug)]
pub struct CheckReport {
    pub directory: PathBuf,
    pub expected_fields: usize,
    pub total_files: usize,
    pub valid_files: usize,
    /// First invalid file; checking stopped there.
    pub invalid: Option<(PathBuf, RowProblem)>,
}

impl CheckReport {
    pub fn checked(&self) -> usize {
        self.valid_files + usize::from(self.invalid.is_some())
    }

    pub fn is_valid(&self) -> bool {
        self.invalid.is_none()
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

fn word_is_empty(record: &StringRecord, expected: usize) -> bool {
    if expected == DEFAULT_FIELDS {
        let parsed: std::result::Result<CsvRecord, _> = record.deserialize(None);
        if let Ok(entry) = parsed {
            return !entry.is_header() && entry.word.trim().is_empty();
        }
    }
    record.get(0).map_or(true, |w| w.trim().is_empty())
}

/// `None` when every non-blank row is well formed.
pub fn check_file(path: &Path, expected: usize) -> Option<RowProblem> {
    let mut reader = match ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
    {
        Ok(r) => r,
        Err(e) => {
            return Some(RowProblem {
                line: 0,
                kind: ProblemKind::Unreadable(e.to_string()),
                content: String::new(),
            })
        }
    };

    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                return Some(RowProblem {
                    line: e.position().map_or(0, |p| p.line()),
                    kind: ProblemKind::Unreadable(e.to_string()),
                    content: String::new(),
                })
            }
        };
        if is_blank(&record) {
            continue;
        }

        let line = record.position().map_or(0, |p| p.line());
        let content = record.iter().collect::<Vec<_>>().join(",");
        if record.len() != expected {
            return Some(RowProblem {
                line,
                kind: ProblemKind::FieldCount {
                    expected,
                    found: record.len(),
                },
                content,
            });
        }
        if word_is_empty(&record, expected) {
            return Some(RowProblem {
                line,
                kind: ProblemKind::EmptyWord,
                content,
            });
        }
    }
    None
}

/// Check every `*.csv` in `dir` in name order, stopping at the first bad one.
pub fn check_dir(dir: &Path, expected: usize) -> Result<CheckReport> {
    let files = corpus::list_csv_files(dir)?;
    let mut report = CheckReport {
        directory: dir.to_path_buf(),
        expected_fields: expected,
        total_files: files.len(),
        valid_files: 0,
        invalid: None,
    };

    for path in files {
        let name = corpus::display_name(&path);
        match check_file(&path, expected) {
            None => {
                info!(file = %name, "valid");
                report.valid_files += 1;
            }
            Some(problem) => {
                warn!(file = %name, problem = %problem, "invalid CSV file, stopping");
                report.invalid = Some((path, problem));
                break;
            }
        }
    }
    Ok(report)
}

pub fn print_summary(report: &CheckReport) {
    println!();
    println!("=== Check Summary ===");
    println!("Directory:       {}", report.directory.display());
    println!("Expected fields: {}", report.expected_fields);
    if report.total_files == 0 {
        println!("No CSV files found in the directory.");
        return;
    }
    match &report.invalid {
        None => {
            println!("Files checked:   {}", report.total_files);
            println!(
                "All files have exactly {} fields per line.",
                report.expected_fields
            );
        }
        Some((path, problem)) => {
            println!(
                "Files checked:   {} out of {}",
                report.checked(),
                report.total_files
            );
            println!("Valid files:     {}", report.valid_files);
            println!("Invalid file:    {}", corpus::display_name(path));
            println!("  {}", problem);
            if !problem.content.is_empty() {
                println!("  Line content: {}", problem.content);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CANONICAL_HEADER;
    use std::fs;
    use tempfile::tempdir;

    const ROW: &str = "ஆப்பிள்,,,aappil,ApPil,āppil,aːppil,apple,ஆப்பிள்";

    #[test]
    fn valid_file_with_header_and_blank_lines() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("fruits.csv");
        fs::write(&path, format!("{}\n{}\n\n,,,,,,,,\n{}\n", CANONICAL_HEADER, ROW, ROW)).unwrap();
        assert_eq!(check_file(&path, DEFAULT_FIELDS), None);
    }

    #[test]
    fn quoted_comma_counts_as_one_field() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("phrases.csv");
        fs::write(&path, "வா,,,vaa,vA,vā,vaː,\"come, arrive\",வா\n").unwrap();
        assert_eq!(check_file(&path, DEFAULT_FIELDS), None);
    }

    #[test]
    fn reports_first_short_row() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("birds.csv");
        fs::write(&path, format!("{}\n{}\ncrow,only,three\nx,y\n", CANONICAL_HEADER, ROW)).unwrap();

        let problem = check_file(&path, DEFAULT_FIELDS).unwrap();
        assert_eq!(problem.line, 3);
        assert_eq!(
            problem.kind,
            ProblemKind::FieldCount {
                expected: 9,
                found: 3
            }
        );
        assert_eq!(problem.content, "crow,only,three");
    }

    #[test]
    fn empty_word_is_invalid() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("colors.csv");
        fs::write(&path, " ,,,red,,,,red,சிவப்பு\n").unwrap();
        let problem = check_file(&path, DEFAULT_FIELDS).unwrap();
        assert_eq!(problem.kind, ProblemKind::EmptyWord);
        assert_eq!(problem.line, 1);
    }

    #[test]
    fn custom_field_count() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("raw.csv");
        fs::write(&path, "a,b,c,d,e\nf,g,h,i,j\n").unwrap();
        assert_eq!(check_file(&path, 5), None);
        assert!(check_file(&path, 9).is_some());
    }

    #[test]
    fn directory_stops_at_first_invalid_file() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("a.csv"), format!("{}\n", ROW)).unwrap();
        fs::write(tmp.path().join("b.csv"), "short,row\n").unwrap();
        fs::write(tmp.path().join("c.csv"), "also,short\n").unwrap();

        let report = check_dir(tmp.path(), DEFAULT_FIELDS).unwrap();
        assert_eq!(report.total_files, 3);
        assert_eq!(report.valid_files, 1);
        assert_eq!(report.checked(), 2);
        let (path, _) = report.invalid.unwrap();
        assert_eq!(corpus::display_name(&path), "b.csv");
    }

    #[test]
    fn empty_directory_is_valid() {
        let tmp = tempdir().unwrap();
        let report = check_dir(tmp.path(), DEFAULT_FIELDS).unwrap();
        assert_eq!(report.total_files, 0);
        assert!(report.is_valid());
    }
}
