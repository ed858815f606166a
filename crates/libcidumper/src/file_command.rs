//! Append-only workflow command files (`GITHUB_ENV`, `GITHUB_PATH`).
//!
//! Lines written here are applied by the runner to later steps of the job,
//! not to the current process.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use crate::environment::Environment;
use crate::errors::{DumperError, DumperResult};

pub const GITHUB_ENV: &str = "GITHUB_ENV";
pub const GITHUB_PATH: &str = "GITHUB_PATH";

/// Paths of the persisted environment and path files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCommands {
    env_file: PathBuf,
    path_file: Option<PathBuf>,
}

impl FileCommands {
    /// Locate the command files. `GITHUB_PATH` is only required when
    /// `needs_path` is set.
    pub fn resolve(env: &Environment, needs_path: bool) -> DumperResult<Self> {
        let env_file = PathBuf::from(env.require(GITHUB_ENV)?);
        let path_file = if needs_path {
            Some(PathBuf::from(env.require(GITHUB_PATH)?))
        } else {
            None
        };
        Ok(Self {
            env_file,
            path_file,
        })
    }

    pub fn env_file(&self) -> &Path {
        &self.env_file
    }

    pub fn path_file(&self) -> Option<&Path> {
        self.path_file.as_deref()
    }

    /// Persist `name=value` for the following steps.
    pub fn append_env(&self, name: &str, value: &str) -> DumperResult<()> {
        debug!("{GITHUB_ENV}: {name}={value}");
        append(&self.env_file, &env_record(name, value))
    }

    /// Persist `dir` as a new PATH entry for the following steps.
    pub fn append_path(&self, dir: &str) -> DumperResult<()> {
        let file = self
            .path_file
            .as_deref()
            .ok_or_else(|| DumperError::MissingVariable(GITHUB_PATH.to_string()))?;
        debug!("{GITHUB_PATH}: {dir}");
        append(file, &format!("{dir}\n"))
    }
}

/// Single line `NAME=value`, or the heredoc form for multi-line values.
fn env_record(name: &str, value: &str) -> String {
    if !value.contains('\n') {
        return format!("{name}={value}\n");
    }

    let mut delimiter = format!("ghadelimiter_{}", std::process::id());
    while value.contains(&delimiter) {
        delimiter.push('_');
    }
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

fn append(path: &Path, record: &str) -> DumperResult<()> {
    let io_err = |source: std::io::Error| DumperError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    file.write_all(record.as_bytes()).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn env_for(dir: &TempDir) -> Environment {
        [
            (GITHUB_ENV, dir.path().join("env.txt")),
            (GITHUB_PATH, dir.path().join("path.txt")),
        ]
        .into_iter()
        .map(|(k, v)| (k, v.to_string_lossy().into_owned()))
        .collect()
    }

    #[test]
    fn env_file_is_always_required() {
        let env: Environment = [(GITHUB_PATH, "/tmp/path")].into_iter().collect();
        let err = FileCommands::resolve(&env, false).unwrap_err();
        assert!(err.to_string().contains(GITHUB_ENV));
    }

    #[test]
    fn path_file_only_required_when_needed() {
        let env: Environment = [(GITHUB_ENV, "/tmp/env")].into_iter().collect();
        let files = FileCommands::resolve(&env, false).unwrap();
        assert!(files.path_file().is_none());

        let err = FileCommands::resolve(&env, true).unwrap_err();
        assert!(matches!(err, DumperError::MissingVariable(name) if name == GITHUB_PATH));
    }

    #[test]
    fn appends_without_touching_existing_lines() {
        let dir = TempDir::new().unwrap();
        let files = FileCommands::resolve(&env_for(&dir), true).unwrap();
        fs::write(files.env_file(), "EARLIER=1\n").unwrap();

        files.append_env("PYTHONPATH", "/opt/action").unwrap();
        files.append_path("/opt/action").unwrap();

        assert_eq!(
            fs::read_to_string(files.env_file()).unwrap(),
            "EARLIER=1\nPYTHONPATH=/opt/action\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("path.txt")).unwrap(),
            "/opt/action\n"
        );
    }

    #[test]
    fn multiline_values_use_heredoc() {
        let record = env_record("NOTE", "one\ntwo");
        let lines: Vec<&str> = record.lines().collect();
        assert_eq!(lines.len(), 4);
        let delimiter = lines[0].strip_prefix("NOTE<<").unwrap();
        assert_eq!(&lines[1..3], ["one", "two"]);
        assert_eq!(lines[3], delimiter);
    }

    #[test]
    fn heredoc_delimiter_avoids_value() {
        let clash = format!("x\nghadelimiter_{}", std::process::id());
        let record = env_record("NOTE", &clash);
        let delimiter = record.lines().next().unwrap().strip_prefix("NOTE<<").unwrap();
        assert!(!clash.lines().any(|l| l == delimiter));
    }

    #[test]
    fn unwritable_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let env: Environment = [(
            GITHUB_ENV,
            dir.path().join("missing").join("env.txt").to_string_lossy().into_owned(),
        )]
        .into_iter()
        .collect();
        let files = FileCommands::resolve(&env, false).unwrap();
        let err = files.append_env("A", "b").unwrap_err();
        assert!(matches!(err, DumperError::Io { .. }));
    }
}
