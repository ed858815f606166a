//! Resolution of the action's runtime settings.

use std::path::{Path, PathBuf};

use crate::environment::Environment;
use crate::errors::{DumperError, DumperResult};
use crate::module::ModuleLauncher;

/// Set by the runner to the checkout directory of the running action.
pub const GITHUB_ACTION_PATH: &str = "GITHUB_ACTION_PATH";

/// Settings shared by every entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionConfig {
    /// Directory holding the action's own files. Added to the module search
    /// path and, on some hosts, to PATH.
    pub action_dir: PathBuf,
    pub launcher: ModuleLauncher,
    /// Run package manager commands through `sudo`.
    pub elevate: bool,
}

/// Pick the action directory: an explicit value wins, then
/// `GITHUB_ACTION_PATH`, then the directory holding `exe`.
///
/// The result is not checked for existence.
pub fn resolve_action_dir(
    explicit: Option<&Path>,
    env: &Environment,
    exe: Option<&Path>,
) -> DumperResult<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = env.get(GITHUB_ACTION_PATH).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    exe.and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .ok_or(DumperError::NoActionDir)
}
