use std::io::{self, BufRead, Write};
use std::path::Path;

use super::command::ImportFailure;
use crate::config::FailureMode;
use crate::corpus;

/// Decides whether a batch keeps going after a file failed to import.
pub trait FailurePolicy {
    fn should_continue(&mut self, path: &Path, failure: &ImportFailure) -> bool;
}

pub struct ContinueOnFailure;

impl FailurePolicy for ContinueOnFailure {
    fn should_continue(&mut self, _path: &Path, _failure: &ImportFailure) -> bool {
        true
    }
}

pub struct StopOnFirstFailure;

impl FailurePolicy for StopOnFirstFailure {
    fn should_continue(&mut self, _path: &Path, _failure: &ImportFailure) -> bool {
        false
    }
}

/// Asks the operator. Only `y`/`yes` continues; EOF or a read error stops.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl Prompt<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> FailurePolicy for Prompt<R, W> {
    fn should_continue(&mut self, path: &Path, failure: &ImportFailure) -> bool {
        let asked = write!(
            self.output,
            "Import of {} failed: {}\nContinue with remaining files? [y/N] ",
            corpus::display_name(path),
            failure
        )
        .and_then(|_| self.output.flush());
        if asked.is_err() {
            return false;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        }
    }
}

/// Policy for a configured mode; `Prompt` reads the process's terminal.
pub fn for_mode(mode: FailureMode) -> Box<dyn FailurePolicy> {
    match mode {
        FailureMode::Prompt => Box::new(Prompt::stdio()),
        FailureMode::Continue => Box::new(ContinueOnFailure),
        FailureMode::Stop => Box::new(StopOnFirstFailure),
    }
}
