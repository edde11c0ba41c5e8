//! Removal of bracketed clarification terms such as `(adj)`, `(noun)` or
//! `(N)` from dictionary fields.
//!
//! Files are read as CSV records, so a quoted field may span several lines.
//! Only records that contain a bracket term are re-encoded; every other
//! record is kept byte for byte, including its line ending.

use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};
use tracing::{error, info, instrument};

use crate::atomic::AtomicFile;
use crate::corpus;
use crate::error::{CorpusError, Result};

static BRACKET_TERM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^)]*\)").expect("bracket pattern is valid"));

const SHOWN_CHANGES: usize = 5;

/// One rewritten record. `line` is the line its first field starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChange {
    pub line: usize,
    pub before: String,
    pub after: String,
    pub terms: Vec<String>,
}

#[derive(Debug, Default)]
pub struct FileCleanup {
    pub lines: usize,
    pub terms_removed: usize,
    pub changes: Vec<LineChange>,
}

#[derive(Debug)]
pub struct CleanupReport {
    pub directory: PathBuf,
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub files: Vec<(PathBuf, Result<FileCleanup>)>,
}

impl CleanupReport {
    pub fn failed(&self) -> usize {
        self.files.iter().filter(|(_, r)| r.is_err()).count()
    }

    fn cleaned(&self) -> impl Iterator<Item = &FileCleanup> {
        self.files.iter().filter_map(|(_, r)| r.as_ref().ok())
    }

    pub fn total_lines(&self) -> usize {
        self.cleaned().map(|f| f.lines).sum()
    }

    pub fn total_terms(&self) -> usize {
        self.cleaned().map(|f| f.terms_removed).sum()
    }

    pub fn total_changes(&self) -> usize {
        self.cleaned().map(|f| f.changes.len()).sum()
    }
}

/// Which parts of the per-file output `print_summary` shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowChanges {
    pub lines: bool,
    pub diff: bool,
}

impl Default for ShowChanges {
    fn default() -> Self {
        Self {
            lines: true,
            diff: true,
        }
    }
}

/// Drop every bracket term and collapse the whitespace left behind.
pub fn clean_field(text: &str) -> String {
    let stripped = BRACKET_TERM.replace_all(text, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn csv_err(context: &str, e: csv::Error) -> CorpusError {
    CorpusError::io(context, std::io::Error::other(e.to_string()))
}

/// Parse `content` into records, each paired with the byte offset it starts at.
/// Offsets partition the input: a record's raw text runs up to the next offset.
fn read_records(content: &str) -> Result<Vec<(usize, StringRecord)>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    let mut record = StringRecord::new();
    while reader
        .read_record(&mut record)
        .map_err(|e| csv_err("parsing CSV", e))?
    {
        let offset = record.position().map_or(0, |p| p.byte() as usize);
        records.push((offset, record.clone()));
    }
    Ok(records)
}

fn encode_record(fields: &[String]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer
        .write_record(fields)
        .map_err(|e| csv_err("encoding CSV row", e))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| CorpusError::io("encoding CSV row", e.into_error()))?;
    let line = String::from_utf8_lossy(&bytes);
    Ok(line.trim_end_matches('\n').to_string())
}

/// Clean one record; `None` when it has no bracket terms.
fn clean_record(record: &StringRecord, body: &str, line: usize) -> Result<Option<LineChange>> {
    let terms: Vec<String> = record
        .iter()
        .flat_map(|field| BRACKET_TERM.find_iter(field).map(|m| m.as_str().to_string()))
        .collect();
    if terms.is_empty() {
        return Ok(None);
    }

    let cleaned: Vec<String> = record.iter().map(clean_field).collect();
    Ok(Some(LineChange {
        line,
        before: body.to_string(),
        after: encode_record(&cleaned)?,
        terms,
    }))
}

/// Clean `input` and write the result to `output` (which may be `input`).
///
/// In place, the file is only rewritten when something changed. With a
/// separate output every file is written. Nothing is written on a dry run.
#[instrument(level = "debug", skip(output), fields(file = %input.display()))]
pub fn cleanup_file(input: &Path, output: &Path, dry_run: bool) -> Result<FileCleanup> {
    let content = fs::read_to_string(input)
        .map_err(|e| CorpusError::io(format!("reading {}", input.display()), e))?;
    let records = read_records(&content)?;

    let mut result = FileCleanup {
        lines: content.lines().count(),
        ..FileCleanup::default()
    };
    let mut rewritten = String::with_capacity(content.len());
    let first = records.first().map_or(content.len(), |(offset, _)| *offset);
    rewritten.push_str(&content[..first]);

    for (idx, (offset, record)) in records.iter().enumerate() {
        let end = records.get(idx + 1).map_or(content.len(), |(next, _)| *next);
        let raw = &content[*offset..end];
        // blank lines skipped by the reader sit in front of the record
        let lead = raw.len() - raw.trim_start_matches(['\r', '\n']).len();
        let body = raw[lead..].trim_end_matches(['\r', '\n']);
        let ending = &raw[lead + body.len()..];
        let line = 1 + content[..offset + lead].matches('\n').count();

        match clean_record(record, body, line)? {
            Some(change) => {
                rewritten.push_str(&raw[..lead]);
                rewritten.push_str(&change.after);
                rewritten.push_str(ending);
                result.terms_removed += change.terms.len();
                result.changes.push(change);
            }
            None => rewritten.push_str(raw),
        }
    }

    let in_place = input == output;
    if dry_run || (in_place && result.changes.is_empty()) {
        return Ok(result);
    }
    let mut out = AtomicFile::new(output)?;
    out.write_all(rewritten.as_bytes())?;
    out.commit()?;
    Ok(result)
}

fn hunk_range(start: usize, count: usize) -> String {
    if count == 1 {
        start.to_string()
    } else {
        format!("{},{}", start, count)
    }
}

/// Unified diff of one file's changes, without context lines.
pub fn unified_diff(name: &str, file: &FileCleanup) -> String {
    let mut out = String::new();
    if file.changes.is_empty() {
        return out;
    }
    let _ = writeln!(out, "--- a/{}", name);
    let _ = writeln!(out, "+++ b/{}", name);

    // records can shrink when a multi-line field is collapsed
    let mut shift: isize = 0;
    for change in &file.changes {
        let removed: Vec<&str> = change
            .before
            .split('\n')
            .map(|l| l.trim_end_matches('\r'))
            .collect();
        let added: Vec<&str> = change.after.split('\n').collect();
        let new_start = (change.line as isize + shift).max(1) as usize;

        let _ = writeln!(
            out,
            "@@ -{} +{} @@",
            hunk_range(change.line, removed.len()),
            hunk_range(new_start, added.len())
        );
        for l in &removed {
            let _ = writeln!(out, "-{}", l);
        }
        for l in &added {
            let _ = writeln!(out, "+{}", l);
        }
        shift += added.len() as isize - removed.len() as isize;
    }
    out
}

/// Clean every `*.csv` in `dir`, in place or into `output_dir`.
pub fn cleanup_dir(dir: &Path, output_dir: Option<&Path>, dry_run: bool) -> Result<CleanupReport> {
    let files = corpus::list_csv_files(dir)?;
    let out_dir = output_dir.unwrap_or(dir).to_path_buf();
    if !dry_run && out_dir != dir {
        fs::create_dir_all(&out_dir)
            .map_err(|e| CorpusError::io(format!("creating {}", out_dir.display()), e))?;
    }

    let mut report = CleanupReport {
        directory: dir.to_path_buf(),
        output_dir: out_dir,
        dry_run,
        files: Vec::with_capacity(files.len()),
    };

    for path in files {
        let name = corpus::display_name(&path);
        let target = match path.file_name() {
            Some(file_name) => report.output_dir.join(file_name),
            None => path.clone(),
        };
        let result = cleanup_file(&path, &target, dry_run);
        match &result {
            Ok(f) if f.terms_removed > 0 => info!(
                file = %name,
                lines = f.lines,
                terms = f.terms_removed,
                changed = f.changes.len(),
                dry_run,
                "bracket terms removed"
            ),
            Ok(f) => info!(file = %name, lines = f.lines, "no bracket terms"),
            Err(e) => error!(file = %name, error = %e, "cleanup failed"),
        }
        report.files.push((path, result));
    }
    Ok(report)
}

pub fn print_summary(report: &CleanupReport, show: ShowChanges) {
    for (path, result) in &report.files {
        let Ok(file) = result else { continue };
        if file.changes.is_empty() {
            continue;
        }
        let name = corpus::display_name(path);
        println!("\n{}:", name);
        if show.lines {
            for change in file.changes.iter().take(SHOWN_CHANGES) {
                println!("  Line {}: removed {:?}", change.line, change.terms);
                println!("    Before: {}", change.before);
                println!("    After:  {}", change.after);
            }
            if file.changes.len() > SHOWN_CHANGES {
                println!("  ... and {} more changes", file.changes.len() - SHOWN_CHANGES);
            }
        }
        if show.diff {
            print!("{}", unified_diff(&name, file));
        }
    }

    println!();
    println!("=== Cleanup Summary ===");
    if report.dry_run {
        println!("Mode:            dry run, no files modified");
    } else {
        println!("Output:          {}", report.output_dir.display());
    }
    println!("Files processed: {}", report.files.len() - report.failed());
    println!("Files failed:    {}", report.failed());
    println!("Lines processed: {}", report.total_lines());
    println!("Terms removed:   {}", report.total_terms());
    println!("Lines changed:   {}", report.total_changes());
}
