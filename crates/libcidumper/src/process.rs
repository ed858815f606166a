//! Subprocess scaffolding: command descriptions, exit reports and the
//! runner seam used by every entry point.

use std::collections::BTreeMap;
use std::fmt;
use std::process::{Command, ExitStatus, Stdio};

use log::debug;

use crate::errors::{DumperError, DumperResult};

/// A program, its arguments and the environment overrides it runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    env: BTreeMap<String, String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Override one variable on top of the inherited environment.
    pub fn env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arg_list(&self) -> &[String] {
        &self.args
    }

    pub fn env_overrides(&self) -> &BTreeMap<String, String> {
        &self.env
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// How a child process terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitReport {
    code: Option<i32>,
    signal: Option<i32>,
}

impl ExitReport {
    pub fn exited(code: i32) -> Self {
        Self {
            code: Some(code),
            signal: None,
        }
    }

    pub fn signaled(signal: i32) -> Self {
        Self {
            code: None,
            signal: Some(signal),
        }
    }

    pub fn from_status(status: ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = std::os::unix::process::ExitStatusExt::signal(&status);
        #[cfg(not(unix))]
        let signal = None;

        Self {
            code: status.code(),
            signal,
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Status to hand back to the host runner.
    ///
    /// Codes outside `0..=255` collapse to 1; a signal death maps to
    /// `128 + signal` as shells report it.
    pub fn exit_code(&self) -> u8 {
        match (self.code, self.signal) {
            (Some(code), _) => u8::try_from(code).unwrap_or(1),
            (None, Some(signal)) => u8::try_from(128 + signal).unwrap_or(u8::MAX),
            (None, None) => 1,
        }
    }
}

impl fmt::Display for ExitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code, self.signal) {
            (Some(code), _) => write!(f, "exit code {code}"),
            (None, Some(signal)) => write!(f, "signal {}", signal_name(signal)),
            (None, None) => f.write_str("unknown termination"),
        }
    }
}

#[cfg(unix)]
fn signal_name(signal: i32) -> String {
    match nix::sys::signal::Signal::try_from(signal) {
        Ok(sig) => sig.as_str().to_string(),
        Err(_) => signal.to_string(),
    }
}

#[cfg(not(unix))]
fn signal_name(signal: i32) -> String {
    signal.to_string()
}

/// Launches commands on behalf of the entry points.
pub trait Runner {
    /// Run `spec` to completion and report how it ended.
    fn run(&mut self, spec: &CommandSpec) -> DumperResult<ExitReport>;
}

/// Spawns real child processes, blocking until each one exits.
///
/// Standard input is closed; standard output and error are shared with the
/// caller. No timeout is applied.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&mut self, spec: &CommandSpec) -> DumperResult<ExitReport> {
        debug!("spawning {spec}");
        let status = Command::new(spec.program())
            .args(spec.arg_list())
            .envs(spec.env_overrides())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| DumperError::Spawn {
                program: spec.program().to_string(),
                source,
            })?;
        let report = ExitReport::from_status(status);
        debug!("{} finished with {report}", spec.program());
        Ok(report)
    }
}

/// Records every command instead of spawning it.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingRunner {
    pub calls: Vec<CommandSpec>,
    replies: std::collections::VecDeque<ExitReport>,
}

#[cfg(test)]
impl RecordingRunner {
    /// Queue the reports handed back to successive calls; once drained
    /// every call succeeds.
    pub fn with_replies(replies: impl IntoIterator<Item = ExitReport>) -> Self {
        Self {
            calls: Vec::new(),
            replies: replies.into_iter().collect(),
        }
    }
}

#[cfg(test)]
impl Runner for RecordingRunner {
    fn run(&mut self, spec: &CommandSpec) -> DumperResult<ExitReport> {
        self.calls.push(spec.clone());
        Ok(self.replies.pop_front().unwrap_or(ExitReport::exited(0)))
    }
}
