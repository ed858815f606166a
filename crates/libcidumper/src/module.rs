//! Invocation of the external crash analysis module.

use std::fmt;

use crate::process::CommandSpec;

pub const DEFAULT_INTERPRETER: &str = "python";
pub const DEFAULT_MODULE: &str = "ci_core_dumper";

/// Subcommands exposed by the external module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleCommand {
    /// Hook core dumps before the code under test runs.
    Install,
    /// Restore the host's previous crash handling.
    Uninstall,
    /// Print backtraces for any dumps captured since install.
    Report,
}

impl ModuleCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            ModuleCommand::Install => "install",
            ModuleCommand::Uninstall => "uninstall",
            ModuleCommand::Report => "report",
        }
    }
}

impl fmt::Display for ModuleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interpreter and module name used to reach the external module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLauncher {
    pub interpreter: String,
    pub module: String,
}

impl Default for ModuleLauncher {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            module: DEFAULT_MODULE.to_string(),
        }
    }
}

impl ModuleLauncher {
    /// `<interpreter> -m <module> -v <command> <forwarded...>`
    ///
    /// Forwarded arguments are passed through verbatim and in order.
    pub fn command(&self, command: ModuleCommand, forwarded: &[String]) -> CommandSpec {
        CommandSpec::new(&self.interpreter)
            .args(["-m", self.module.as_str(), "-v", command.as_str()])
            .args(forwarded.iter().cloned())
    }
}
