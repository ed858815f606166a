//! Reporting phase: delegate to the external module and pass its status on.

use log::warn;

use crate::errors::DumperResult;
use crate::module::{ModuleCommand, ModuleLauncher};
use crate::process::{ExitReport, Runner};

/// Launch `report` with `forwarded` appended. Nothing is written or
/// installed; output belongs to the module.
pub fn analyze(
    launcher: &ModuleLauncher,
    runner: &mut dyn Runner,
    forwarded: &[String],
) -> DumperResult<ExitReport> {
    delegate(launcher, ModuleCommand::Report, runner, forwarded)
}

/// Launch `uninstall`, restoring the host's crash handling.
pub fn cleanup(
    launcher: &ModuleLauncher,
    runner: &mut dyn Runner,
    forwarded: &[String],
) -> DumperResult<ExitReport> {
    delegate(launcher, ModuleCommand::Uninstall, runner, forwarded)
}

fn delegate(
    launcher: &ModuleLauncher,
    command: ModuleCommand,
    runner: &mut dyn Runner,
    forwarded: &[String],
) -> DumperResult<ExitReport> {
    let report = runner.run(&launcher.command(command, forwarded))?;
    if !report.success() {
        warn!("{} {command} finished with {report}", launcher.module);
    }
    Ok(report)
}
