//! Explicit environment map threaded through the entry points.

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;

use crate::errors::{DumperError, DumperResult};

/// Module search path consulted by the external module's interpreter.
pub const PYTHONPATH: &str = "PYTHONPATH";

/// Snapshot of process environment variables.
///
/// Changes made here are never written back to the live process; they reach
/// child processes through [`crate::process::CommandSpec::env`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
    /// Names that were set to something other than unicode.
    undecodable: BTreeSet<String>,
}

impl Environment {
    /// Capture the current process environment.
    pub fn capture() -> Self {
        Self::from_os_vars(std::env::vars_os())
    }

    /// Build from raw OS pairs. Values that are not unicode are remembered
    /// by name so [`Environment::lookup`] can refuse them.
    pub fn from_os_vars(vars: impl IntoIterator<Item = (OsString, OsString)>) -> Self {
        let mut env = Self::default();
        for (name, value) in vars {
            let Ok(name) = name.into_string() else {
                continue;
            };
            match value.into_string() {
                Ok(value) => env.set(name, value),
                Err(_) => {
                    env.undecodable.insert(name);
                }
            }
        }
        env
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Like [`Environment::get`], but a variable that is set to a non-unicode
    /// value is an error instead of looking unset.
    pub fn lookup(&self, name: &str) -> DumperResult<Option<&str>> {
        if self.undecodable.contains(name) {
            return Err(DumperError::NotUnicode(name.to_string()));
        }
        Ok(self.get(name))
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.undecodable.remove(&name);
        self.vars.insert(name, value.into());
    }

    /// Look up a variable that must be present and non-empty.
    pub fn require(&self, name: &str) -> DumperResult<&str> {
        match self.get(name) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(DumperError::MissingVariable(name.to_string())),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Environment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            undecodable: BTreeSet::new(),
        }
    }
}

/// Put `entry` in front of a delimiter-joined path list.
pub fn prepend_search_path(current: Option<&str>, entry: &str, delimiter: char) -> String {
    match current {
        Some(rest) if !rest.is_empty() => format!("{entry}{delimiter}{rest}"),
        _ => entry.to_string(),
    }
}
