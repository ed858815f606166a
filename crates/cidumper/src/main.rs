//! Command-line interface for the ci-core-dumper action.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use libcidumper::analyze::{analyze, cleanup};
use libcidumper::config::{ActionConfig, resolve_action_dir};
use libcidumper::environment::Environment;
use libcidumper::module::{DEFAULT_INTERPRETER, DEFAULT_MODULE, ModuleLauncher};
use libcidumper::platform::HostPlatform;
use libcidumper::prepare::Preparer;
use libcidumper::process::{ExitReport, Runner, SystemRunner};
use log::info;

/// Top-level argument parser describing the action entry points.
#[derive(Parser, Debug)]
#[command(
    name = "cidumper",
    version,
    about = "Capture and report core dumps during CI runs",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

/// Subcommands exposed by the action frontend.
#[derive(Subcommand, Debug)]
enum Command {
    /// Install the debugger and hook core dumps before the build runs.
    Prepare {
        /// Directory holding the action files [default: $GITHUB_ACTION_PATH,
        /// then the directory of this executable].
        #[arg(long)]
        action_dir: Option<PathBuf>,
        #[command(flatten)]
        module: ModuleArgs,
        /// Arguments passed on to `install`.
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Report backtraces for any core dumps captured so far.
    Analyze {
        #[command(flatten)]
        module: ModuleArgs,
        /// Arguments passed on to `report`.
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Restore the host's original crash handling.
    Cleanup {
        #[command(flatten)]
        module: ModuleArgs,
        /// Arguments passed on to `uninstall`.
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Display version information for diagnostics.
    Version,
}

/// How the external module is reached.
#[derive(Args, Debug)]
struct ModuleArgs {
    /// Interpreter used to run the module.
    #[arg(long, default_value = DEFAULT_INTERPRETER)]
    python: String,
    /// Module name passed to `-m`.
    #[arg(long, default_value = DEFAULT_MODULE)]
    module: String,
}

impl From<ModuleArgs> for ModuleLauncher {
    fn from(args: ModuleArgs) -> Self {
        ModuleLauncher {
            interpreter: args.python,
            module: args.module,
        }
    }
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let mut host = Host::detect();
    let code = dispatch(cli.cmd, &mut host, &mut SystemRunner, &mut io::stdout())?;
    Ok(ExitCode::from(code))
}

/// The running host as seen by the entry points.
struct Host {
    env: Environment,
    exe: Option<PathBuf>,
    platform: HostPlatform,
    elevate: bool,
}

impl Host {
    fn detect() -> Self {
        Self {
            env: Environment::capture(),
            exe: std::env::current_exe().ok(),
            platform: HostPlatform::current(),
            elevate: needs_sudo(),
        }
    }
}

/// Run one subcommand and return the status the process should exit with.
fn dispatch(
    cmd: Command,
    host: &mut Host,
    runner: &mut dyn Runner,
    out: &mut dyn Write,
) -> Result<u8> {
    let report = match cmd {
        Command::Prepare {
            action_dir,
            module,
            args,
        } => prepare(host, action_dir, module.into(), runner, out, &args)?,
        Command::Analyze { module, args } => analyze(&module.into(), runner, &args)
            .context("failed to run the report step")?,
        Command::Cleanup { module, args } => cleanup(&module.into(), runner, &args)
            .context("failed to run the uninstall step")?,
        Command::Version => {
            writeln!(out, "cidumper {}", libcidumper::version())?;
            return Ok(0);
        }
    };
    Ok(report.exit_code())
}

fn prepare(
    host: &mut Host,
    action_dir: Option<PathBuf>,
    launcher: ModuleLauncher,
    runner: &mut dyn Runner,
    out: &mut dyn Write,
    args: &[String],
) -> Result<ExitReport> {
    let action_dir = resolve_action_dir(action_dir.as_deref(), &host.env, host.exe.as_deref())
        .context("pass --action-dir or set GITHUB_ACTION_PATH")?;
    let config = ActionConfig {
        action_dir,
        launcher,
        elevate: host.elevate,
    };
    info!(
        "Preparing {:?} host from {}",
        host.platform,
        config.action_dir.display()
    );

    Preparer::new(&config, host.platform)
        .run(&mut host.env, runner, out, args)
        .context("host preparation failed")
}

#[cfg(unix)]
fn needs_sudo() -> bool {
    !nix::unistd::geteuid().is_root()
}

#[cfg(not(unix))]
fn needs_sudo() -> bool {
    false
}
