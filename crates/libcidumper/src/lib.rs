//! Core library facade for the ci-core-dumper action.
//! Provides modules reused by the CLI front end.

pub mod analyze;
pub mod config;
pub mod environment;
pub mod errors;
pub mod file_command;
pub mod module;
pub mod platform;
pub mod prepare;
pub mod process;
pub mod workflow;

pub use errors::{DumperError, DumperResult};

/// Exposes the crate version for CLI reporting.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
