//! Setup phase: install the debugger, publish the module search path and
//! hand over to the external module's `install` subcommand.

use std::io::Write;

use log::warn;

use crate::config::ActionConfig;
use crate::environment::{Environment, PYTHONPATH, prepend_search_path};
use crate::errors::{DumperError, DumperResult};
use crate::file_command::FileCommands;
use crate::module::ModuleCommand;
use crate::platform::{HostPlatform, install_plan};
use crate::process::{ExitReport, Runner};
use crate::workflow::LogGroup;

/// Runs the setup phase for one host platform.
#[derive(Debug)]
pub struct Preparer<'a> {
    config: &'a ActionConfig,
    platform: HostPlatform,
}

impl<'a> Preparer<'a> {
    pub fn new(config: &'a ActionConfig, platform: HostPlatform) -> Self {
        Self { config, platform }
    }

    /// Prepare the host and launch `install`, returning how it exited.
    ///
    /// `env` receives the updated `PYTHONPATH`; the live process environment
    /// is left alone. Package manager failures are logged and skipped, the
    /// install status is handed back to the caller. Missing command file
    /// variables, a non-unicode `PYTHONPATH` or action directory abort
    /// before anything is spawned or written.
    pub fn run(
        &self,
        env: &mut Environment,
        runner: &mut dyn Runner,
        out: &mut dyn Write,
        forwarded: &[String],
    ) -> DumperResult<ExitReport> {
        let action_dir = self.config.action_dir.to_str().ok_or_else(|| {
            DumperError::NotUnicode(format!(
                "action directory {}",
                self.config.action_dir.display()
            ))
        })?;
        writeln!(out, "{action_dir}")?;

        let policy = self.platform.policy();
        let files = FileCommands::resolve(env, policy.needs_path_override)?;
        let prior_search_path = env.lookup(PYTHONPATH)?.map(str::to_owned);

        let plan = install_plan(policy.packages, self.config.elevate);
        if !plan.is_empty() {
            let group = LogGroup::start(&mut *out, "Install GDB")?;
            for step in &plan {
                // A missing debugger only degrades the report; keep going.
                match runner.run(step) {
                    Ok(report) if report.success() => {}
                    Ok(report) => warn!("`{step}` failed with {report}, continuing"),
                    Err(err) => warn!("{err}, continuing"),
                }
            }
            group.end()?;
        }

        let search_path = prepend_search_path(
            prior_search_path.as_deref(),
            action_dir,
            policy.path_delimiter,
        );
        env.set(PYTHONPATH, search_path.as_str());
        files.append_env(PYTHONPATH, &search_path)?;

        if policy.needs_path_override {
            writeln!(out, "Adjust PATH")?;
            files.append_path(action_dir)?;
        }

        let group = LogGroup::start(&mut *out, "ci-core-dumper install")?;
        let spec = self
            .config
            .launcher
            .command(ModuleCommand::Install, forwarded)
            .env(PYTHONPATH, search_path);
        let report = runner.run(&spec)?;
        group.end()?;

        if !report.success() {
            warn!("{} install finished with {report}", self.config.launcher.module);
        }
        Ok(report)
    }
}
