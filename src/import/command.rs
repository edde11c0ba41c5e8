use std::{
    ffi::OsString,
    future::Future,
    path::Path,
    process::Stdio,
    time::Duration,
};
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::config::{ImportConfig, FILE_PLACEHOLDER};

const STDERR_TAIL_CHARS: usize = 400;

/// Why a single file was not imported.
#[derive(Debug, Error)]
pub enum ImportFailure {
    #[error("could not start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("import exited with status {code}: {stderr}")]
    Exited { code: i32, stderr: String },

    #[error("import killed by a signal: {stderr}")]
    Signalled { stderr: String },

    #[error("import timed out after {0:?}")]
    TimedOut(Duration),
}

/// The external dictionary engine's import operation, seen as pass/fail.
pub trait Importer {
    fn import(&self, path: &Path) -> impl Future<Output = Result<(), ImportFailure>> + Send;
}

/// Runs one external program per file.
///
/// Arguments containing `{file}` get the path substituted; when none does,
/// the path is appended as the last argument.
#[derive(Debug, Clone)]
pub struct CommandImporter {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandImporter {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(config: &ImportConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone(), config.timeout())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn build_args(&self, path: &Path) -> Vec<OsString> {
        let mut substituted = false;
        let mut out: Vec<OsString> = self
            .args
            .iter()
            .map(|arg| {
                if !arg.contains(FILE_PLACEHOLDER) {
                    return OsString::from(arg);
                }
                substituted = true;
                let mut built = OsString::new();
                for (i, part) in arg.split(FILE_PLACEHOLDER).enumerate() {
                    if i > 0 {
                        built.push(path.as_os_str());
                    }
                    built.push(part);
                }
                built
            })
            .collect();
        if !substituted {
            out.push(path.as_os_str().to_os_string());
        }
        out
    }
}

impl Importer for CommandImporter {
    fn import(&self, path: &Path) -> impl Future<Output = Result<(), ImportFailure>> + Send {
        debug!(file = %path.display(), program = %self.program, "running import");
        let mut cmd = Command::new(&self.program);
        cmd.args(self.build_args(path))
            .stdin(Stdio::null())
            .kill_on_drop(true);
        let program = self.program.clone();
        let limit = self.timeout;

        async move {
            // Dropping the output future on timeout kills the child.
            let output = match limit {
                Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
                    Ok(res) => res,
                    Err(_) => return Err(ImportFailure::TimedOut(limit)),
                },
                None => cmd.output().await,
            }
            .map_err(|source| ImportFailure::Spawn {
                command: program,
                source,
            })?;

            let stdout = String::from_utf8_lossy(&output.stdout);
            if !stdout.trim().is_empty() {
                debug!(stdout = %stdout.trim(), "import output");
            }

            if output.status.success() {
                return Ok(());
            }
            let stderr = tail(&output.stderr);
            match output.status.code() {
                Some(code) => Err(ImportFailure::Exited { code, stderr }),
                None => Err(ImportFailure::Signalled { stderr }),
            }
        }
    }
}

/// Last few hundred characters of a stream, trimmed, for error messages.
fn tail(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    let count = text.chars().count();
    if count <= STDERR_TAIL_CHARS {
        return text.to_string();
    }
    let skipped: String = text.chars().skip(count - STDERR_TAIL_CHARS).collect();
    format!("…{}", skipped)
}
