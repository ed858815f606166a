//! Host platform detection and the per-platform preparation policy.

use crate::process::CommandSpec;

/// Operating system family of the runner host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Linux,
    Windows,
    MacOs,
    Other,
}

/// What preparation a host platform needs before the module is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformPolicy {
    /// Debugger packages installed through the system package manager.
    pub packages: &'static [&'static str],
    /// Whether the action directory must be added to the persisted PATH.
    pub needs_path_override: bool,
    /// Separator for path-list variables.
    pub path_delimiter: char,
}

impl HostPlatform {
    /// Platform of the running binary.
    pub fn current() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` style name onto a platform.
    pub fn from_os_name(name: &str) -> Self {
        match name {
            "linux" => HostPlatform::Linux,
            "windows" => HostPlatform::Windows,
            "macos" => HostPlatform::MacOs,
            _ => HostPlatform::Other,
        }
    }

    pub fn policy(self) -> PlatformPolicy {
        match self {
            HostPlatform::Linux => PlatformPolicy {
                packages: &["gdb"],
                needs_path_override: false,
                path_delimiter: ':',
            },
            // The action directory carries a `ulimit` shim that must be on %PATH%.
            HostPlatform::Windows => PlatformPolicy {
                packages: &[],
                needs_path_override: true,
                path_delimiter: ';',
            },
            HostPlatform::MacOs | HostPlatform::Other => PlatformPolicy {
                packages: &[],
                needs_path_override: false,
                path_delimiter: ':',
            },
        }
    }
}

/// Commands that refresh the package index and install `packages`.
///
/// With `elevate` set each command is run through `sudo`. An empty package
/// list yields an empty plan.
pub fn install_plan(packages: &[&str], elevate: bool) -> Vec<CommandSpec> {
    if packages.is_empty() {
        return Vec::new();
    }

    let mut install = vec!["--yes", "--no-install-recommends", "install"];
    install.extend_from_slice(packages);

    [vec!["update"], install]
        .into_iter()
        .map(|args| {
            let mut argv: Vec<String> = Vec::with_capacity(args.len() + 2);
            if elevate {
                argv.push("sudo".into());
            }
            argv.push("apt-get".into());
            argv.extend(args.into_iter().map(String::from));
            let program = argv.remove(0);
            CommandSpec::new(program).args(argv)
        })
        .collect()
}
