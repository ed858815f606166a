//! Error taxonomy for the action core.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Unified result type across the action core.
pub type DumperResult<T> = Result<T, DumperError>;

/// Error cases
#[derive(Debug, Error)]
pub enum DumperError {
    /// A host-provided variable the action cannot run without.
    #[error("required environment variable {0} is not set")]
    MissingVariable(String),

    /// A value that has to be written to a text command file is not unicode.
    #[error("{0} is not valid unicode")]
    NotUnicode(String),

    #[error("unable to locate the action directory")]
    NoActionDir,

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write log output: {0}")]
    Output(#[from] io::Error),

    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}
