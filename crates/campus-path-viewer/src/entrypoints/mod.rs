//! Process entry points: CLI parsing, logging setup and the native runner.

pub mod cli;
pub mod logging;
mod metadata;
pub mod run;

pub use metadata::log_version_info;
