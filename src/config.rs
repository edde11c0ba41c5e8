//! Import settings, read from an optional YAML file and overridden by flags.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

/// Placeholder replaced by the absolute CSV path in `args`.
pub const FILE_PLACEHOLDER: &str = "{file}";

const DEFAULT_COMMAND: &str = "dictpress";
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// What the importer does after a file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Ask on the terminal whether to go on.
    #[default]
    Prompt,
    /// Record the failure and keep going.
    Continue,
    /// Stop at the first failure.
    Stop,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    pub command: String,
    pub args: Vec<String>,
    /// Zero disables the limit.
    pub timeout_secs: u64,
    pub on_failure: FailureMode,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_COMMAND.to_string(),
            args: vec![format!("--import={}", FILE_PLACEHOLDER)],
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            on_failure: FailureMode::default(),
        }
    }
}

impl ImportConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading import config {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("parsing import config {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let config: ImportConfig = serde_yaml::from_str(raw)?;
        if config.command.trim().is_empty() {
            anyhow::bail!("import command must not be empty");
        }
        Ok(config)
    }

    /// `None` when imports may run without a time limit.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Apply command-line overrides on top of the file values.
    pub fn with_overrides(
        mut self,
        command: Option<String>,
        timeout_secs: Option<u64>,
        on_failure: Option<FailureMode>,
    ) -> Self {
        if let Some(command) = command {
            self.command = command;
        }
        if let Some(secs) = timeout_secs {
            self.timeout_secs = secs;
        }
        if let Some(mode) = on_failure {
            self.on_failure = mode;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn misspelled_key_is_rejected() {
        let err = ImportConfig::from_yaml("timeout: 30\n").unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let config = ImportConfig::from_yaml("timeout_secs: 30\non_failure: stop\n").unwrap();
        assert_eq!(config.command, "dictpress");
        assert_eq!(config.args, vec!["--import={file}"]);
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.on_failure, FailureMode::Stop);
    }

    #[test]
    fn full_yaml_from_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("import.yaml");
        fs::write(
            &path,
            "command: ./dictpress\nargs: [\"--config\", \"prod.toml\", \"--import={file}\"]\ntimeout_secs: 0\non_failure: continue\n",
        )
        .unwrap();

        let config = ImportConfig::load(&path).unwrap();
        assert_eq!(config.command, "./dictpress");
        assert_eq!(config.args.len(), 3);
        assert_eq!(config.timeout(), None);
        assert_eq!(config.on_failure, FailureMode::Continue);
    }

    #[test]
    fn rejects_empty_command_and_unknown_mode() {
        assert!(ImportConfig::from_yaml("command: \"  \"\n").is_err());
        assert!(ImportConfig::from_yaml("on_failure: sometimes\n").is_err());
    }

    #[test]
    fn overrides_win() {
        let config = ImportConfig::default().with_overrides(
            Some("true".to_string()),
            Some(5),
            Some(FailureMode::Continue),
        );
        assert_eq!(config.command, "true");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.on_failure, FailureMode::Continue);
    }
}
